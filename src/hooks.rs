use crate::config::RESIZE_DEBOUNCE_MS;
use crate::controller::{PerformanceAction, PerformanceState};
use crate::frame_loop::{RafScheduler, WatchdogRunner};
use crate::hardware::HardwareSignals;
use crate::tier::Tier;
use crate::tier_config::{lookup, TierConfig};
use gloo_timers::callback::Timeout;
use log::warn;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use yew::prelude::*;

/// Shared handle to the one controller instance. Dispatching an action is the
/// only way to change it.
pub type PerformanceHandle = UseReducerHandle<PerformanceState>;

#[derive(Properties, PartialEq)]
pub struct PerformanceProviderProps {
    #[prop_or_default]
    pub children: Html,
}

/// Owns the controller and the watchdog's frame loop for everything below it.
///
/// Hardware is captured and classified once, from the mount effect; until
/// then consumers see the `Balanced` defaults. The frame loop runs
/// while the watchdog is enabled and is released when the provider unmounts.
#[function_component(PerformanceProvider)]
pub fn performance_provider(props: &PerformanceProviderProps) -> Html {
    let perf = use_reducer(PerformanceState::default);
    let runner = use_mut_ref(|| WatchdogRunner::new(RafScheduler));

    {
        let dispatcher = perf.dispatcher();
        use_effect_with((), move |_| {
            dispatcher.dispatch(PerformanceAction::Initialize(HardwareSignals::capture()));
        });
    }

    {
        let runner = runner.clone();
        let dispatcher = perf.dispatcher();
        use_effect_with(perf.watchdog_enabled(), move |&enabled| {
            runner.borrow_mut().set_enabled(enabled, move |fps| {
                dispatcher.dispatch(PerformanceAction::WindowSampled(fps))
            });
            move || runner.borrow_mut().stop()
        });
    }

    html! {
        <ContextProvider<PerformanceHandle> context={perf}>
            { props.children.clone() }
        </ContextProvider<PerformanceHandle>>
    }
}

/// The controller handle, if rendered under a [`PerformanceProvider`].
#[hook]
pub fn use_performance() -> Option<PerformanceHandle> {
    use_context::<PerformanceHandle>()
}

/// Configuration bundle of the active tier. Outside a provider this is the
/// `Balanced` bundle.
#[hook]
pub fn use_tier_config() -> &'static TierConfig {
    match use_context::<PerformanceHandle>() {
        Some(perf) => perf.active_config(),
        None => lookup(Tier::Balanced),
    }
}

fn read_viewport() -> (f64, f64) {
    let window = gloo_utils::window();
    let dim = |v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>, fallback: f64| {
        v.ok().and_then(|v| v.as_f64()).unwrap_or(fallback)
    };
    (
        dim(window.inner_width(), 1280.0),
        dim(window.inner_height(), 720.0),
    )
}

/// Viewport size, updated once resizing has settled.
#[hook]
pub fn use_viewport_size() -> (f64, f64) {
    let size = use_state(read_viewport);

    {
        let size = size.clone();
        use_effect_with((), move |_| {
            let pending: Rc<RefCell<Option<Timeout>>> = Rc::default();
            let listener = Closure::<dyn Fn()>::new({
                let pending = pending.clone();
                move || {
                    let size = size.clone();
                    // Replacing the handle cancels the previous timer
                    *pending.borrow_mut() = Some(Timeout::new(RESIZE_DEBOUNCE_MS, move || {
                        size.set(read_viewport());
                    }));
                }
            });

            let window = gloo_utils::window();
            if let Err(e) =
                window.add_event_listener_with_callback("resize", listener.as_ref().unchecked_ref())
            {
                warn!("Could not watch viewport resizes: {:?}", e);
            }

            move || {
                if let Err(e) = window
                    .remove_event_listener_with_callback("resize", listener.as_ref().unchecked_ref())
                {
                    warn!("Could not stop watching viewport resizes: {:?}", e);
                }
                pending.borrow_mut().take();
                drop(listener);
            }
        });
    }

    *size
}
