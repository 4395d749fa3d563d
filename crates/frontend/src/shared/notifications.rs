//! Fire-and-forget notification center.
//!
//! View-models report outcomes through `NotificationSink`; the browser
//! implementation is a signal-backed list rendered by `NotificationHost`.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::shared::icons::icon;

const AUTO_DISMISS_MS: u32 = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
    Info,
}

impl NoticeLevel {
    fn css_class(&self) -> &'static str {
        match self {
            NoticeLevel::Success => "alert alert--success",
            NoticeLevel::Error => "alert alert--error",
            NoticeLevel::Info => "alert alert--info",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub id: u64,
    pub level: NoticeLevel,
    pub message: String,
}

pub trait NotificationSink: Clone + 'static {
    fn notify(&self, level: NoticeLevel, message: String);

    fn success(&self, message: impl Into<String>) {
        self.notify(NoticeLevel::Success, message.into());
    }

    fn error(&self, message: impl Into<String>) {
        self.notify(NoticeLevel::Error, message.into());
    }

    fn info(&self, message: impl Into<String>) {
        self.notify(NoticeLevel::Info, message.into());
    }
}

/// Application-wide notification list, provided via context.
#[derive(Clone, Copy)]
pub struct Notifications {
    items: RwSignal<Vec<Notice>>,
    next_id: StoredValue<u64>,
}

impl Notifications {
    pub fn new() -> Self {
        Self {
            items: RwSignal::new(Vec::new()),
            next_id: StoredValue::new(1),
        }
    }

    pub fn items(&self) -> Signal<Vec<Notice>> {
        self.items.into()
    }

    pub fn dismiss(&self, id: u64) {
        self.items.update(|items| items.retain(|n| n.id != id));
    }
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationSink for Notifications {
    fn notify(&self, level: NoticeLevel, message: String) {
        let id = self.next_id.get_value();
        self.next_id.set_value(id + 1);
        match level {
            NoticeLevel::Error => log::warn!("notice: {}", message),
            _ => log::debug!("notice: {}", message),
        }
        self.items.update(|items| items.push(Notice { id, level, message }));

        let this = *self;
        spawn_local(async move {
            TimeoutFuture::new(AUTO_DISMISS_MS).await;
            this.dismiss(id);
        });
    }
}

pub fn use_notifications() -> Notifications {
    use_context::<Notifications>().unwrap_or_else(|| {
        log::warn!("Notifications context not found, using a detached instance");
        Notifications::new()
    })
}

#[component]
pub fn NotificationHost() -> impl IntoView {
    let notifications = use_notifications();

    view! {
        <div class="notification-host">
            <For
                each=move || notifications.items().get()
                key=|n| n.id
                children=move |notice| {
                    let id = notice.id;
                    view! {
                        <div class=notice.level.css_class()>
                            <span>{notice.message.clone()}</span>
                            <button
                                class="alert__close"
                                on:click=move |_| notifications.dismiss(id)
                                title="Закрыть"
                            >
                                {icon("x")}
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
