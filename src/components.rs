//! Yew view components.
//!
//! Visual components read the active [`TierConfig`] through
//! [`use_tier_config`] and branch on it; only the developer overlay dispatches
//! controller actions.

use crate::activity::{fetch_activity, ActivitySummary};
use crate::chat::{send_message, ChatReply, ChatTurn, Role, SiteAction};
use crate::config::{SiteConfig, PARTICLE_LINK_DISTANCE_PX};
use crate::content::Project;
use crate::controller::PerformanceAction;
use crate::frame_loop::AnimationFrameLoop;
use crate::hooks::{use_performance, use_tier_config, use_viewport_size};
use crate::particles::ParticleField;
use crate::tier::Tier;
use crate::tier_config::TierConfig;
use crate::utils::format_elapsed;
use chrono::{DateTime, Utc};
use log::warn;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlInputElement};
use yew::prelude::*;

// ──────────────────────────────────────────────────────────────────────────────
// Developer overlay

/// Tier override buttons, watchdog toggle and live FPS readout.
#[function_component(DevOverlay)]
pub fn dev_overlay() -> Html {
    let Some(perf) = use_performance() else {
        return html! {};
    };

    let set_override = |tier: Option<Tier>| {
        let perf = perf.clone();
        Callback::from(move |_: MouseEvent| {
            perf.dispatch(PerformanceAction::SetManualOverride(tier))
        })
    };
    let toggle_watchdog = {
        let perf = perf.clone();
        let enabled = perf.watchdog_enabled();
        Callback::from(move |_: MouseEvent| {
            perf.dispatch(PerformanceAction::SetWatchdogEnabled(!enabled))
        })
    };
    let redetect = {
        let perf = perf.clone();
        Callback::from(move |_: MouseEvent| perf.dispatch(PerformanceAction::ResetDetection))
    };

    let active = perf.active_config();
    let pinned = perf.manual_override();

    html! {
        <aside class="dev-overlay" aria-label="Performance tier controls">
            <div class="dev-overlay__status">
                { format!("{} {} · {} FPS · {:?}", active.icon, active.name, perf.current_fps(), perf.watchdog_state()) }
            </div>
            <div class="dev-overlay__detected">
                { format!("detected {} · {}", perf.detected_tier(),
                          pinned.map_or("auto".to_string(), |t| format!("pinned {}", t))) }
            </div>
            <div class="dev-overlay__tiers">
                { Tier::ALL.iter().map(|&tier| html! {
                    <button
                        class={classes!("dev-overlay__tier", (pinned == Some(tier)).then_some("is-active"))}
                        onclick={set_override(Some(tier))}
                    >
                        { tier.level() }
                    </button>
                }).collect::<Html>() }
                <button
                    class={classes!("dev-overlay__tier", pinned.is_none().then_some("is-active"))}
                    onclick={set_override(None)}
                >
                    { "Auto" }
                </button>
            </div>
            <div class="dev-overlay__actions">
                <button onclick={toggle_watchdog}>
                    { if perf.watchdog_enabled() { "Watchdog: on" } else { "Watchdog: off" } }
                </button>
                <button onclick={redetect}>{ "Re-detect" }</button>
            </div>
            <ul class="dev-overlay__flags">
                { active.flags().iter().map(|(name, on)| html! {
                    <li class={classes!(on.then_some("is-on"))}>{ *name }</li>
                }).collect::<Html>() }
            </ul>
        </aside>
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Particle field

fn draw_particles(ctx: &CanvasRenderingContext2d, field: &ParticleField, lines: bool) {
    ctx.clear_rect(0.0, 0.0, field.width, field.height);

    if lines {
        ctx.set_stroke_style_str("#7dd3fc");
        ctx.set_line_width(0.6);
        for (i, j, weight) in field.links(PARTICLE_LINK_DISTANCE_PX) {
            let (a, b) = (&field.particles[i], &field.particles[j]);
            ctx.set_global_alpha(weight * 0.5);
            ctx.begin_path();
            ctx.move_to(a.x, a.y);
            ctx.line_to(b.x, b.y);
            ctx.stroke();
        }
    }

    ctx.set_global_alpha(0.8);
    ctx.set_fill_style_str("#e0f2fe");
    for p in &field.particles {
        ctx.begin_path();
        if ctx
            .arc(p.x, p.y, p.radius, 0.0, std::f64::consts::TAU)
            .is_ok()
        {
            ctx.fill();
        }
    }
    ctx.set_global_alpha(1.0);
}

fn start_particle_loop(
    canvas_ref: &NodeRef,
    field: Rc<RefCell<ParticleField>>,
    lines: bool,
) -> Option<AnimationFrameLoop> {
    let canvas = canvas_ref.cast::<HtmlCanvasElement>()?;
    {
        let f = field.borrow();
        canvas.set_width(f.width as u32);
        canvas.set_height(f.height as u32);
    }
    let ctx = canvas
        .get_context("2d")
        .ok()
        .flatten()?
        .dyn_into::<CanvasRenderingContext2d>()
        .ok()?;

    let mut last: Option<f64> = None;
    AnimationFrameLoop::start(move |now| {
        let dt = last.map_or(0.0, |t| (now - t) / 1000.0);
        last = Some(now);
        let mut f = field.borrow_mut();
        f.step(dt);
        draw_particles(&ctx, &f, lines);
    })
    .map_err(|e| warn!("Particle field not animated: {}", e))
    .ok()
}

/// Full-viewport decorative canvas behind the hero.
#[function_component(ParticleCanvas)]
pub fn particle_canvas() -> Html {
    let config = use_tier_config();
    let (width, height) = use_viewport_size();
    let canvas_ref = use_node_ref();
    let field = use_mut_ref(ParticleField::default);

    {
        let canvas_ref = canvas_ref.clone();
        let field = field.clone();
        use_effect_with(
            (config.particle_budget, config.particle_lines, width as u32, height as u32),
            move |&(budget, lines, w, h)| {
                {
                    let mut f = field.borrow_mut();
                    if f.particles.len() != budget as usize {
                        *f = ParticleField::spawn(budget, w as f64, h as f64, &mut rand::rng());
                    } else {
                        f.resize(w as f64, h as f64);
                    }
                }
                let frame_loop = if budget > 0 {
                    start_particle_loop(&canvas_ref, field, lines)
                } else {
                    None
                };
                move || drop(frame_loop)
            },
        );
    }

    if config.particle_budget == 0 {
        return html! {};
    }

    html! {
        <canvas
            ref={canvas_ref}
            class={classes!("particle-field", config.blur.then_some("particle-field--blur"))}
            aria-hidden="true"
        />
    }
}

/// CRT-style scan-line overlay, top tier only.
#[function_component(ScanLines)]
pub fn scan_lines() -> Html {
    let config = use_tier_config();
    if !config.scan_lines {
        return html! {};
    }
    html! { <div class="scanlines" aria-hidden="true" /> }
}

// ──────────────────────────────────────────────────────────────────────────────
// Projects

fn shared_layout_style(config: &TierConfig, project: &Project) -> Option<String> {
    config
        .shared_layout
        .then(|| format!("view-transition-name: project-{};", project.id))
}

/// Thumbnail: a muted looping clip where the tier allows autoplay, otherwise
/// the still image.
fn render_thumbnail(config: &TierConfig, project: &Project) -> Html {
    match project.preview {
        Some(src) if config.video_autoplay => html! {
            <video class="project-thumb" src={src} poster={project.thumbnail}
                autoplay=true muted=true loop=true playsinline=true />
        },
        _ => html! {
            <img class="project-thumb" src={project.thumbnail} alt={project.title} loading="lazy" />
        },
    }
}

#[derive(Properties, PartialEq)]
pub struct ProjectCardProps {
    pub project: &'static Project,
    pub index: usize,
    pub onopen: Callback<&'static str>,
}

#[function_component(ProjectCard)]
pub fn project_card(props: &ProjectCardProps) -> Html {
    let config = use_tier_config();
    let project = props.project;
    let onclick = {
        let onopen = props.onopen.clone();
        Callback::from(move |_: MouseEvent| onopen.emit(project.id))
    };
    let delay = config.motion.settle_time_s() * 0.2 * props.index as f32;
    let style = format!(
        "transition: {}; transition-delay: {:.2}s; {}",
        config.motion.css_transition("opacity, transform"),
        delay,
        shared_layout_style(config, project).unwrap_or_default()
    );

    html! {
        <article class={classes!("project-card", config.reveal.css_class())} {style} {onclick}>
            { render_thumbnail(config, project) }
            <h3>{ project.title }</h3>
            <p>{ project.summary }</p>
            <ul class="project-stack">
                { project.stack.iter().map(|s| html! { <li>{ *s }</li> }).collect::<Html>() }
            </ul>
        </article>
    }
}

#[derive(Properties, PartialEq)]
pub struct ProjectModalProps {
    pub project: &'static Project,
    pub onclose: Callback<()>,
}

#[function_component(ProjectModal)]
pub fn project_modal(props: &ProjectModalProps) -> Html {
    let config = use_tier_config();
    let project = props.project;
    let close = {
        let onclose = props.onclose.clone();
        Callback::from(move |_: MouseEvent| onclose.emit(()))
    };
    let stop = Callback::from(|e: MouseEvent| e.stop_propagation());
    let style = format!(
        "transition: {}; {}",
        config.motion.css_transition("opacity, transform"),
        shared_layout_style(config, project).unwrap_or_default()
    );

    html! {
        <div class={classes!("modal-backdrop", config.blur.then_some("modal-backdrop--blur"))} onclick={close.clone()}>
            <div class={classes!("modal", config.modal.css_class())} role="dialog" aria-modal="true"
                {style} onclick={stop}>
                <button class="modal__close" onclick={close} aria-label="Close">{ "×" }</button>
                { render_thumbnail(config, project) }
                <h2>{ project.title }</h2>
                <p>{ project.body }</p>
                <a href={project.url} target="_blank" rel="noopener noreferrer">{ "Source" }</a>
            </div>
        </div>
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Live activity

enum ActivityStatus {
    Loading,
    Ready(ActivitySummary),
    Unavailable,
}

#[derive(Properties, PartialEq)]
pub struct ActivityPanelProps {
    pub config: Rc<SiteConfig>,
}

/// Recent pushes and repositories; shows an offline notice when the fetch
/// fails.
#[function_component(ActivityPanel)]
pub fn activity_panel(props: &ActivityPanelProps) -> Html {
    let status = use_state(|| ActivityStatus::Loading);

    {
        let status = status.clone();
        let config = props.config.clone();
        use_effect_with((), move |_| {
            wasm_bindgen_futures::spawn_local(async move {
                match fetch_activity(&config).await {
                    Some(summary) => status.set(ActivityStatus::Ready(summary)),
                    None => status.set(ActivityStatus::Unavailable),
                }
            });
        });
    }

    let now = Utc::now();
    let ago = |at: Option<DateTime<Utc>>| {
        at.map(|t| format_elapsed((now - t).num_seconds()))
            .unwrap_or_default()
    };

    match &*status {
        ActivityStatus::Loading => html! {
            <div class="activity activity--loading">{ "Loading recent activity…" }</div>
        },
        ActivityStatus::Unavailable => html! {
            <div class="activity activity--offline">{ "Live activity is unavailable right now." }</div>
        },
        ActivityStatus::Ready(summary) if summary.is_empty() => html! {
            <div class="activity">{ "Nothing public lately." }</div>
        },
        ActivityStatus::Ready(summary) => html! {
            <div class="activity">
                <p class="activity__headline">
                    { format!("{} commits recently", summary.total_commits) }
                    if summary.last_push_at.is_some() {
                        { format!(" · last push {}", ago(summary.last_push_at)) }
                    }
                </p>
                <ul class="activity__pushes">
                    { summary.pushes.iter().map(|p| html! {
                        <li>
                            <strong>{ &p.repo }</strong>
                            { format!(" · {} commit{} · {}", p.commits, if p.commits == 1 { "" } else { "s" }, ago(p.at)) }
                            <div class="activity__message">{ &p.latest_message }</div>
                        </li>
                    }).collect::<Html>() }
                </ul>
                <ul class="activity__repos">
                    { summary.repos.iter().map(|r| html! {
                        <li>
                            <a href={r.url.clone()} target="_blank" rel="noopener noreferrer">{ &r.name }</a>
                            if let Some(lang) = &r.language {
                                <span class="activity__lang">{ lang }</span>
                            }
                            <span class="activity__stars">{ format!("★ {}", r.stars) }</span>
                            <p>{ &r.description }</p>
                        </li>
                    }).collect::<Html>() }
                </ul>
            </div>
        },
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Chat

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub turn: ChatTurn,
    pub is_error: bool,
}

#[derive(Debug, Default, PartialEq)]
pub struct ChatLog {
    pub messages: Vec<ChatMessage>,
    pub pending: bool,
}

pub enum ChatLogAction {
    Sent(String),
    Replied(ChatReply),
}

impl Reducible for ChatLog {
    type Action = ChatLogAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut messages = self.messages.clone();
        let pending = match action {
            ChatLogAction::Sent(text) => {
                messages.push(ChatMessage {
                    turn: ChatTurn::user(text),
                    is_error: false,
                });
                true
            }
            ChatLogAction::Replied(reply) => {
                messages.push(ChatMessage {
                    turn: ChatTurn::assistant(reply.text),
                    is_error: reply.is_error,
                });
                false
            }
        };
        Rc::new(ChatLog { messages, pending })
    }
}

impl ChatLog {
    /// Conversation so far, without locally generated error replies.
    pub fn history(&self) -> Vec<ChatTurn> {
        self.messages
            .iter()
            .filter(|m| !m.is_error)
            .map(|m| m.turn.clone())
            .collect()
    }
}

#[derive(Properties, PartialEq)]
pub struct ChatWidgetProps {
    pub config: Rc<SiteConfig>,
    pub on_action: Callback<SiteAction>,
}

#[function_component(ChatWidget)]
pub fn chat_widget(props: &ChatWidgetProps) -> Html {
    let log = use_reducer(ChatLog::default);
    let draft = use_state(String::new);

    let oninput = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            draft.set(input.value());
        })
    };

    let send = {
        let log = log.clone();
        let draft = draft.clone();
        let config = props.config.clone();
        let on_action = props.on_action.clone();
        Callback::from(move |_: ()| {
            let text = draft.trim().to_string();
            if text.is_empty() || log.pending {
                return;
            }
            let history = log.history();
            log.dispatch(ChatLogAction::Sent(text.clone()));
            draft.set(String::new());

            let log = log.clone();
            let config = config.clone();
            let on_action = on_action.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let reply = send_message(&config, &text, &history).await;
                if let Some(action) = reply.site_action() {
                    on_action.emit(action);
                }
                log.dispatch(ChatLogAction::Replied(reply));
            });
        })
    };

    let onkeydown = {
        let send = send.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" && !e.shift_key() {
                e.prevent_default();
                send.emit(());
            }
        })
    };
    let onclick = {
        let send = send.clone();
        Callback::from(move |_: MouseEvent| send.emit(()))
    };

    html! {
        <div class="chat">
            <ul class="chat__log" aria-live="polite">
                { log.messages.iter().map(|m| html! {
                    <li class={classes!(
                        "chat__msg",
                        match m.turn.role { Role::User => "chat__msg--user", Role::Assistant => "chat__msg--bot" },
                        m.is_error.then_some("chat__msg--error")
                    )}>
                        { &m.turn.text }
                    </li>
                }).collect::<Html>() }
                if log.pending {
                    <li class="chat__msg chat__msg--bot chat__msg--typing">{ "…" }</li>
                }
            </ul>
            <div class="chat__input">
                <input
                    type="text"
                    placeholder="Ask me about my work"
                    value={(*draft).clone()}
                    {oninput}
                    {onkeydown}
                />
                <button {onclick} disabled={log.pending}>{ "Send" }</button>
            </div>
        </div>
    }
}
