//! Entry point for the portfolio site.
//! Wires the performance provider, page sections and chat actions.

use folio::chat::SiteAction;
use folio::components::{
    ActivityPanel, ChatWidget, DevOverlay, ParticleCanvas, ProjectCard, ProjectModal, ScanLines,
};
use folio::content::{project, PROJECTS, SECTIONS};
use folio::hooks::{use_tier_config, PerformanceProvider};
use folio::SiteConfig;
use log::{info, warn};
use std::rc::Rc;
use yew::prelude::*;

// ──────────────────────────────────────────────────────────────────────────────
// Helper functions

fn scroll_to_section(id: &str) {
    match gloo_utils::document().get_element_by_id(id) {
        Some(el) => el.scroll_into_view(),
        None => warn!("No section with id '{}'", id),
    }
}

fn open_external(url: &str) {
    if let Err(e) = gloo_utils::window().open_with_url_and_target(url, "_blank") {
        warn!("Could not open {}: {:?}", url, e);
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Page

#[function_component(Main)]
fn main_component() -> Html {
    let config = use_memo((), |_| SiteConfig::from_env());
    let tier = use_tier_config();
    let open_project = use_state(|| None::<&'static str>);

    let onopen = {
        let open_project = open_project.clone();
        Callback::from(move |id: &'static str| open_project.set(Some(id)))
    };
    let onclose = {
        let open_project = open_project.clone();
        Callback::from(move |_: ()| open_project.set(None))
    };

    let on_action = {
        let open_project = open_project.clone();
        Callback::from(move |action: SiteAction| {
            info!("Chat requested {:?}", action);
            match action {
                SiteAction::ScrollTo(id) => scroll_to_section(&id),
                SiteAction::OpenProject(id) => match project(&id) {
                    Some(p) => {
                        scroll_to_section("projects");
                        open_project.set(Some(p.id));
                    }
                    None => warn!("Chat asked for unknown project '{}'", id),
                },
                SiteAction::OpenUrl(url) => open_external(&url),
            }
        })
    };

    let modal = (*open_project).and_then(project).map(|p| {
        html! { <ProjectModal project={p} onclose={onclose.clone()} /> }
    });

    html! {
        <>
            <nav class="site-nav">
                { SECTIONS.iter().map(|&(id, label)| html! {
                    <a href={format!("#{}", id)}>{ label }</a>
                }).collect::<Html>() }
            </nav>

            <header id="about" class={classes!("hero", tier.reveal.css_class())}>
                <ParticleCanvas />
                <ScanLines />
                <h1>{ "Hi, I build fast things in Rust." }</h1>
                <p>{ "Systems, tooling and the occasional browser experiment." }</p>
            </header>

            <section id="projects" class="projects">
                <h2>{ "Projects" }</h2>
                <div class="project-grid">
                    { PROJECTS.iter().enumerate().map(|(index, p)| html! {
                        <ProjectCard key={p.id} project={p} {index} onopen={onopen.clone()} />
                    }).collect::<Html>() }
                </div>
            </section>

            <section id="activity" class="activity-section">
                <h2>{ "Lately" }</h2>
                <ActivityPanel config={Rc::clone(&config)} />
            </section>

            <section id="contact" class="contact">
                <h2>{ "Ask me anything" }</h2>
                <ChatWidget config={Rc::clone(&config)} {on_action} />
            </section>

            if let Some(modal) = modal {
                { modal }
            }
            if config.dev_overlay {
                <DevOverlay />
            }
        </>
    }
}

#[function_component]
pub fn App() -> Html {
    html! {
        <PerformanceProvider>
            <Main />
        </PerformanceProvider>
    }
}

fn main() {
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    console_log::init_with_level(level).ok();
    yew::Renderer::<App>::new().render();
}
