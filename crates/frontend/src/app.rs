use contracts::domain::common::EntityId;
use leptos::prelude::*;
use thaw::*;

use crate::domain::a001_assembly_order::ui::details::AssemblyProcessPage;
use crate::domain::a001_assembly_order::ui::list::AssemblyQueuePage;
use crate::shared::api_utils::ApiConfig;
use crate::shared::icons::icon;
use crate::shared::notifications::{NotificationHost, Notifications};
use crate::system::users::ui::list::UsersListPage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AppSection {
    Users,
    Queue,
    Process,
}

impl AppSection {
    fn all() -> [AppSection; 3] {
        [AppSection::Users, AppSection::Queue, AppSection::Process]
    }

    fn title(&self) -> &'static str {
        match self {
            AppSection::Users => "Пользователи",
            AppSection::Queue => "Очередь сборки",
            AppSection::Process => "Сборка",
        }
    }

    fn icon_name(&self) -> &'static str {
        match self {
            AppSection::Users => "users",
            AppSection::Queue => "queue",
            AppSection::Process => "wrench",
        }
    }
}

#[component]
pub fn App() -> impl IntoView {
    let config = ApiConfig::resolve();
    log::info!("API base url: {}", config.base_url());
    provide_context(config);
    provide_context(Notifications::new());

    let section = RwSignal::new(AppSection::Queue);
    let process_order: RwSignal<Option<EntityId>> = RwSignal::new(None);

    let open_order = Callback::new(move |id: EntityId| {
        process_order.set(Some(id));
        section.set(AppSection::Process);
    });

    view! {
        <div class="app-layout">
            <nav class="app-nav">
                {AppSection::all().into_iter().map(|s| view! {
                    <Button
                        appearance=move || if section.get() == s {
                            ButtonAppearance::Primary
                        } else {
                            ButtonAppearance::Subtle
                        }
                        on_click=move |_| section.set(s)
                    >
                        {icon(s.icon_name())}
                        {format!(" {}", s.title())}
                    </Button>
                }).collect_view()}
            </nav>

            <main class="app-main">
                {move || match section.get() {
                    AppSection::Users => view! { <UsersListPage /> }.into_any(),
                    AppSection::Queue => view! { <AssemblyQueuePage on_open=open_order /> }.into_any(),
                    AppSection::Process => view! { <AssemblyProcessPage order_id=process_order /> }.into_any(),
                }}
            </main>

            <NotificationHost />
        </div>
    }
}
