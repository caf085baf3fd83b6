use std::rc::Rc;

use gloo_timers::callback::Timeout;
use yew::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

impl ToastKind {
    fn class(&self) -> &'static str {
        match self {
            ToastKind::Success => "success",
            ToastKind::Error => "error",
            ToastKind::Info => "info",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    /// Inserted but not yet transitioned in.
    Entering,
    Visible,
    /// Fading out; removed once the transition ends.
    Leaving,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: usize,
    pub kind: ToastKind,
    pub message: String,
    pub phase: ToastPhase,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ToastAction {
    Push { id: usize, kind: ToastKind, message: String },
    Show(usize),
    Dismiss(usize),
    Remove(usize),
}

/// Stacked toasts, oldest first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ToastQueue {
    pub toasts: Vec<Toast>,
}

impl ToastQueue {
    fn set_phase(&mut self, id: usize, phase: ToastPhase) {
        if let Some(toast) = self.toasts.iter_mut().find(|t| t.id == id) {
            toast.phase = phase;
        }
    }
}

impl Reducible for ToastQueue {
    type Action = ToastAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            ToastAction::Push { id, kind, message } => next.toasts.push(Toast {
                id,
                kind,
                message,
                phase: ToastPhase::Entering,
            }),
            ToastAction::Show(id) => next.set_phase(id, ToastPhase::Visible),
            ToastAction::Dismiss(id) => next.set_phase(id, ToastPhase::Leaving),
            ToastAction::Remove(id) => next.toasts.retain(|t| t.id != id),
        }
        Rc::new(next)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToastTiming {
    pub enter_delay_ms: u32,
    pub duration_ms: u32,
    pub fade_ms: u32,
}

#[derive(Clone, PartialEq)]
pub struct ToastContext {
    notify: Callback<(ToastKind, String)>,
}

impl ToastContext {
    pub fn show(&self, kind: ToastKind, message: impl Into<String>) {
        self.notify.emit((kind, message.into()));
    }
}

/// Outside a `ToastProvider` notifications only reach the log.
impl Default for ToastContext {
    fn default() -> Self {
        Self {
            notify: Callback::from(|(kind, message): (ToastKind, String)| {
                log::warn!("No toast container; dropped {:?} toast: {}", kind, message);
            }),
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct ToastProviderProps {
    pub children: Children,
    pub timing: ToastTiming,
}

fn dispatch_later(delay_ms: u32, queue: UseReducerDispatcher<ToastQueue>, action: ToastAction) {
    Timeout::new(delay_ms, move || queue.dispatch(action)).forget();
}

#[function_component(ToastProvider)]
pub fn toast_provider(props: &ToastProviderProps) -> Html {
    let queue = use_reducer(ToastQueue::default);
    let next_id = use_mut_ref(|| 0usize);

    let notify = {
        let dispatcher = queue.dispatcher();
        let timing = props.timing;
        Callback::from(move |(kind, message): (ToastKind, String)| {
            let id = {
                let mut next = next_id.borrow_mut();
                *next += 1;
                *next
            };
            dispatcher.dispatch(ToastAction::Push { id, kind, message });

            dispatch_later(timing.enter_delay_ms, dispatcher.clone(), ToastAction::Show(id));
            dispatch_later(timing.duration_ms, dispatcher.clone(), ToastAction::Dismiss(id));
            dispatch_later(
                timing.duration_ms + timing.fade_ms,
                dispatcher.clone(),
                ToastAction::Remove(id),
            );
        })
    };

    html! {
        <ContextProvider<ToastContext> context={ToastContext { notify }}>
            { props.children.clone() }
            <div id="toastContainer" class="toast-container">
                { for queue.toasts.iter().map(|toast| {
                    let shown = toast.phase == ToastPhase::Visible;
                    html! {
                        <div key={toast.id} class={classes!("toast", toast.kind.class(), shown.then_some("show"))}>
                            <div class="toast-message">{ &toast.message }</div>
                        </div>
                    }
                }) }
            </div>
        </ContextProvider<ToastContext>>
    }
}
