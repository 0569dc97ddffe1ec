//! Static page content.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: &'static str,
    pub title: &'static str,
    pub summary: &'static str,
    pub body: &'static str,
    pub stack: &'static [&'static str],
    pub thumbnail: &'static str,
    /// Looping preview clip, autoplayed on tiers that allow it
    pub preview: Option<&'static str>,
    pub url: &'static str,
}

pub static PROJECTS: &[Project] = &[
    Project {
        id: "folio",
        title: "This site",
        summary: "A portfolio that measures its own frame rate and backs off when your device struggles.",
        body: "Written in Rust and compiled to WebAssembly. Hardware signals pick a starting quality tier; a frame-rate watchdog steps it down if frames are being dropped. The chat assistant knows what I pushed this week.",
        stack: &["Rust", "Yew", "WebAssembly"],
        thumbnail: "/assets/folio.webp",
        preview: Some("/assets/folio.webm"),
        url: "https://github.com/octocat/folio",
    },
    Project {
        id: "tracer",
        title: "Tracer",
        summary: "A small path tracer that renders progressively in the browser.",
        body: "Tiles are rendered in a worker and streamed to a canvas. Sample counts adapt to how long each tile took to keep the page responsive.",
        stack: &["Rust", "WebGPU"],
        thumbnail: "/assets/tracer.webp",
        preview: Some("/assets/tracer.webm"),
        url: "https://github.com/octocat/tracer",
    },
    Project {
        id: "ledger",
        title: "Ledger",
        summary: "Plain-text accounting with a terminal UI.",
        body: "Parses ledger-style journals, reconciles against bank exports and renders monthly reports in the terminal.",
        stack: &["Rust", "ratatui"],
        thumbnail: "/assets/ledger.webp",
        preview: None,
        url: "https://github.com/octocat/ledger",
    },
];

pub fn project(id: &str) -> Option<&'static Project> {
    PROJECTS.iter().find(|p| p.id == id)
}

/// Page sections, in order, as `(element id, nav label)`.
pub const SECTIONS: &[(&str, &str)] = &[
    ("about", "About"),
    ("projects", "Projects"),
    ("activity", "Activity"),
    ("contact", "Contact"),
];
