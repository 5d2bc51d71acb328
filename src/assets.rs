//! Files the web build caches for offline use.

use serde::Serialize;

/// Bundled assets, relative to the application root.
pub const INTERNAL: &[&str] = &[
    "bislib.css",
    "bislib.js",
    "connviewer.css",
    "connviewer.html",
    "console.html",
    "dualviewer.css",
    "dualviewer.html",
    "editor.css",
    "editor.html",
    "index.css",
    "index.html",
    "index.js",
    "libbiswasm_wasm.js",
    "mni2tal.css",
    "mni2tal.html",
    "manifest.json",
    "overlayviewer.css",
    "overlayviewer.html",
    "viewer.css",
    "viewer.html",
    "spectviewer.css",
    "spectviewer.html",
    "fmriviewer.css",
    "fmriviewer.html",
    "bootstrap.min.js",
    "bootstrap_dark_edited.css",
    "fonts/glyphicons-halflings-regular.eot",
    "fonts/glyphicons-halflings-regular.svg",
    "fonts/glyphicons-halflings-regular.ttf",
    "fonts/glyphicons-halflings-regular.woff",
    "fonts/glyphicons-halflings-regular.woff2",
    "images/MNI_T1_1mm_stripped_ras.nii.gz",
    "images/MNI_T1_1mm_stripped_xy.png",
    "images/MNI_T1_2mm_stripped_ras.nii.gz",
    "images/ISAS_SPECT_Mask.nii.gz",
    "images/ISAS_SPECT_Template.nii.gz",
    "images/ISASHN_Standard_Deviation.nii.gz",
    "images/Reorder_Atlas.nii.gz",
    "images/bioimagesuite.png",
    "images/bislogo.png",
    "images/bislogomed.png",
    "images/blend_xy.png",
    "images/colin_talairach_lookup_xy.png",
    "images/connviewer.png",
    "images/dualviewer.png",
    "images/editor.png",
    "images/favicon.ico",
    "images/gray_highres_groupncut150_right5_left1_emily_reord_new.nii.gz",
    "images/lobes_left.json",
    "images/lobes_right.json",
    "images/mni2tal.png",
    "images/neg_mat.txt",
    "images/overlayviewer.png",
    "images/paravision.png",
    "images/pos_mat.txt",
    "images/shen.json",
    "images/tal2mni_lookup_xy.png",
    "images/viewer.biswebstate",
    "images/viewer.png",
    "images/yale_broadmann_2mm_ras.nii.gz",
    "images/yale_broadmann_ras.nii.gz",
    "images/yale_brod_xy.png",
    "jquery.min.js",
    "webcomponents-lite.js",
    "biswebaws.html",
    "aws-sdk.min.js",
    "amazon-cognito-auth.min.js",
    "images/32px.png",
    "images/40px.png",
    "images/throbber.gif",
];

/// Remote resources (web fonts).
pub const EXTERNAL: &[&str] = &[
    "https://fonts.googleapis.com/css?family=Lato:400,700,400italic",
    "https://fonts.gstatic.com/s/lato/v14/S6u9w4BMUTPHh6UVSwiPGQ.woff2",
    "https://fonts.gstatic.com/s/lato/v14/S6uyw4BMUTPHjx4wXg.woff2",
    "https://fonts.gstatic.com/s/lato/v14/S6u9w4BMUTPHh6UVSwiPGQ3q5d0.woff2",
    "https://fonts.gstatic.com/s/lato/v14/S6u8w4BMUTPHjxsAXC-qNiXg7Q.woff2",
    "https://fonts.gstatic.com/s/lato/v14/S6uyw4BMUTPHjx4wXiWtFCc.woff2",
];

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CacheManifest {
    pub internal: &'static [&'static str],
    pub external: &'static [&'static str],
}

pub fn cache_manifest() -> CacheManifest {
    CacheManifest {
        internal: INTERNAL,
        external: EXTERNAL,
    }
}
