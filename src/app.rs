//! Root application component with routing and the auth provider.
//!
//! SYSTEM CONTEXT
//! ==============
//! `AuthProvider` owns the one [`SessionContext`] for the page. The session
//! never leaves this module: components talk to it through the callbacks on
//! [`AppContext`] and observe it through the mirrored `auth` signal.

use std::rc::Rc;

use leptos::prelude::*;
#[cfg(feature = "ssr")]
use leptos_meta::MetaTags;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::notice_stack::NoticeStack;
use crate::config::AuthConfig;
use crate::net::browser::BrowserAuthApi;
use crate::pages::{callback::CallbackPage, home::HomePage, login::LoginPage};
use crate::state::app::AppContext;
use crate::state::auth::AuthState;
use crate::state::notices::{Notice, Notices};
use crate::state::session::{LOGIN_ROUTE, SessionContext, SessionEffects};
use crate::util::browser::{open_login_window, page_origin};
use crate::util::dark_mode::{self, DarkMode};
use crate::util::storage::LocalStore;

/// Notices dismiss themselves after this long.
pub const NOTICE_TIMEOUT_MS: u32 = 4_000;

type BrowserSession = SessionContext<BrowserAuthApi, LocalStore, BrowserEffects>;
type SessionHandle = StoredValue<Rc<BrowserSession>, LocalStorage>;

/// HTML shell rendered on the server for SSR + hydration.
#[cfg(feature = "ssr")]
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="Studio"/>

        <Router>
            <AuthProvider>
                <NoticeStack/>
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route path=StaticSegment("login") view=LoginPage/>
                    <Route path=StaticSegment("") view=HomePage/>
                    <Route path=(StaticSegment("auth"), StaticSegment("callback")) view=CallbackPage/>
                </Routes>
            </AuthProvider>
        </Router>
    }
}

/// Session side effects bound to Leptos signals and the router.
pub struct BrowserEffects {
    auth: RwSignal<AuthState>,
    notices: RwSignal<Notices>,
    navigate: Rc<dyn Fn(&str)>,
}

impl SessionEffects for BrowserEffects {
    fn notify(&self, notice: Notice) {
        let Some(id) = self.notices.try_update(|n| n.push(notice)) else {
            return;
        };
        #[cfg(feature = "hydrate")]
        {
            let notices = self.notices;
            gloo_timers::callback::Timeout::new(NOTICE_TIMEOUT_MS, move || {
                let _ = notices.try_update(|n| n.dismiss(id));
            })
            .forget();
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = id;
        }
    }

    fn navigate(&self, path: &str) {
        (self.navigate)(path);
    }

    fn session_changed(&self, state: &AuthState) {
        self.auth.set(state.clone());
    }
}

/// Resolve build-time config and trust the page's own origin.
fn resolve_config() -> AuthConfig {
    let config = AuthConfig::from_build_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "invalid auth config; using defaults");
        AuthConfig::default()
    });
    let Some(origin) = page_origin() else {
        return config;
    };
    match config.clone().with_trusted_origin(&origin) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "page origin not trusted");
            config
        }
    }
}

/// Run an async session operation on the local executor.
fn spawn_session<F, Fut>(session: SessionHandle, run: F)
where
    F: FnOnce(Rc<BrowserSession>) -> Fut + 'static,
    Fut: Future<Output = ()> + 'static,
{
    #[cfg(feature = "hydrate")]
    {
        leptos::task::spawn_local(run(session.get_value()));
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (session, run);
    }
}

/// Provides [`AppContext`] to `children` and drives the session lifecycle.
///
/// Must render inside a `<Router>`.
#[component]
pub fn AuthProvider(children: Children) -> impl IntoView {
    let config = resolve_config();
    let store = LocalStore;

    let auth = RwSignal::new(AuthState::default());
    let notices = RwSignal::new(Notices::default());
    let dark_mode = RwSignal::new(dark_mode::read_preference(&store));
    dark_mode::apply(dark_mode.get_untracked());

    let navigate = use_navigate();
    let effects = BrowserEffects {
        auth,
        notices,
        navigate: Rc::new(move |path| navigate(path, NavigateOptions::default())),
    };

    let cookie_name = config.cookie_name();
    let pricing_url = StoredValue::new(config.pricing_page_url());
    let api = BrowserAuthApi::from_config(&config);
    let session: SessionHandle = StoredValue::new_local(Rc::new(SessionContext::new(config, api, store, effects)));

    let login = Callback::new(move |()| {
        spawn_session(session, |session| async move {
            let url = session.login().await;
            if !url.is_empty() {
                open_login_window(&url);
            }
        });
    });
    let logout = Callback::new(move |()| {
        spawn_session(session, |session| async move { session.logout().await });
    });
    let complete_callback = Callback::new(move |(code, state): (String, Option<String>)| {
        spawn_session(session, move |session| async move {
            if session.complete_callback(&code, state.as_deref()).await.is_err() {
                session.effects().navigate(LOGIN_ROUTE);
            }
        });
    });
    let set_dark_mode = Callback::new(move |mode: DarkMode| {
        dark_mode.set(mode);
        dark_mode::set_preference(&LocalStore, mode);
    });

    spawn_session(session, |session| async move { session.initialize().await });

    #[cfg(feature = "hydrate")]
    {
        let handle = window_event_listener(leptos::ev::message, move |ev| {
            let origin = ev.origin();
            let data = crate::util::browser::message_data(&ev);
            let outcome = session.with_value(|session| session.handle_message(&origin, &data));
            tracing::debug!(?outcome, %origin, "window message handled");
        });
        on_cleanup(move || handle.remove());
    }

    provide_context(AppContext {
        auth,
        notices,
        dark_mode,
        cookie_name,
        pricing_url,
        login,
        logout,
        complete_callback,
        set_dark_mode,
    });

    children()
}
