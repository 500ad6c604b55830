//! Navigation shell: picks the unauthenticated or authenticated flow off
//! the session channel, keeps the route stack, and drives the screens
//! from an interactive terminal loop.

use std::io::Write as _;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::entity::Photo;
use crate::models::LocalImage;
use crate::screens::{
    AlbumDetailScreen, CreateAlbumScreen, FeedScreen, LoginScreen, PhotoViewerScreen,
    ProfileScreen, ProfileTab, RegisterScreen,
};
use crate::session::{Session, SessionState, SessionUser};
use crate::state::AppContext;

/// Destinations reachable in the app.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Login,
    Register,
    Feed,
    AlbumDetail {
        album_id: String,
        /// Set when a feed row was selected: the detail screen jumps
        /// straight into the viewer at this photo.
        photo_id: Option<String>,
    },
    /// The full photo list and starting index travel through navigation;
    /// no pagination cursor does.
    PhotoViewer {
        photos: Vec<Photo>,
        initial_index: usize,
    },
    CreateAlbum,
    Profile,
}

/// Tabs of the authenticated flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Feed,
    Create,
    Profile,
}

/// Navigation requests emitted by screens.
#[derive(Debug, Clone, PartialEq)]
pub enum Nav {
    Push(Route),
    Back,
    Tab(Tab),
}

/// Which top-level flow is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Session state not yet known.
    Loading,
    /// Login/Register stack.
    Auth,
    /// Tabbed main flow.
    Main,
}

/// Route stack and tab state. Pure bookkeeping, no I/O.
#[derive(Debug)]
pub struct Shell {
    tab: Tab,
    stack: Vec<Route>,
    register: bool,
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}

impl Shell {
    pub fn new() -> Self {
        Self {
            tab: Tab::Feed,
            stack: Vec::new(),
            register: false,
        }
    }

    /// Pick the active flow for a session snapshot.
    pub fn flow(state: &SessionState) -> Flow {
        if state.loading {
            Flow::Loading
        } else if state.user.is_some() {
            Flow::Main
        } else {
            Flow::Auth
        }
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    fn tab_root(&self) -> Route {
        match self.tab {
            Tab::Feed => Route::Feed,
            Tab::Create => Route::CreateAlbum,
            Tab::Profile => Route::Profile,
        }
    }

    /// Route currently on screen in the authenticated flow.
    pub fn current_route(&self) -> Route {
        self.stack.last().cloned().unwrap_or_else(|| self.tab_root())
    }

    /// Route currently on screen in the unauthenticated flow.
    pub fn current_auth_route(&self) -> Route {
        if self.register {
            Route::Register
        } else {
            Route::Login
        }
    }

    /// Apply a navigation request to the stack.
    pub fn apply(&mut self, nav: Nav) {
        match nav {
            Nav::Push(Route::Register) => self.register = true,
            Nav::Push(Route::Login) => self.register = false,
            // The jump target is consumed at mount time; going back to
            // the detail screen must not re-open the viewer.
            Nav::Push(Route::AlbumDetail { album_id, .. }) => {
                self.stack.push(Route::AlbumDetail {
                    album_id,
                    photo_id: None,
                });
            }
            Nav::Push(route) => self.stack.push(route),
            Nav::Back => {
                if self.stack.pop().is_none() {
                    self.register = false;
                }
            }
            Nav::Tab(tab) => {
                self.tab = tab;
                self.stack.clear();
            }
        }
    }
}

enum Active {
    None,
    Login(LoginScreen),
    Register(RegisterScreen),
    Feed(FeedScreen),
    Album(AlbumDetailScreen),
    Viewer(PhotoViewerScreen),
    Create(CreateAlbumScreen),
    Profile(ProfileScreen),
}

enum Outcome {
    Stay,
    Nav(Nav),
    Quit,
}

/// Drive the app on stdin/stdout until EOF or `quit`.
pub async fn run(ctx: AppContext) -> std::io::Result<()> {
    let mut session_rx = ctx.session.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let mut shell = Shell::new();
    let mut flow = Flow::Loading;
    let mut active = Active::None;

    loop {
        let state = ctx.session.current();
        let new_flow = Shell::flow(&state);
        if new_flow != flow || matches!(active, Active::None) {
            flow = new_flow;
            shell = Shell::new();
            active = match flow {
                Flow::Loading => Active::None,
                Flow::Auth => mount(&ctx, shell.current_auth_route()).await.0,
                Flow::Main => mount(&ctx, shell.current_route()).await.0,
            };
        }

        if flow == Flow::Loading {
            if session_rx.changed().await.is_err() {
                return Ok(());
            }
            continue;
        }

        println!("{}", render(&active, &state));
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            return Ok(());
        };

        match dispatch(&ctx, &mut active, &state, line.trim()).await {
            Outcome::Quit => return Ok(()),
            Outcome::Stay => {}
            Outcome::Nav(first) => {
                let mut nav = Some(first);
                while let Some(step) = nav.take() {
                    shell.apply(step.clone());
                    let route = match step {
                        // Mount the pushed route as requested (jump
                        // target included); the stack keeps the
                        // normalized form.
                        Nav::Push(route) => route,
                        Nav::Back | Nav::Tab(_) => match flow {
                            Flow::Auth => shell.current_auth_route(),
                            _ => shell.current_route(),
                        },
                    };
                    let (screen, follow_up) = mount(&ctx, route).await;
                    active = screen;
                    nav = follow_up;
                }
            }
        }
    }
}

async fn mount(ctx: &AppContext, route: Route) -> (Active, Option<Nav>) {
    match route {
        Route::Login => (Active::Login(LoginScreen::new()), None),
        Route::Register => (Active::Register(RegisterScreen::new()), None),
        Route::Feed => (Active::Feed(FeedScreen::load(&ctx.gallery).await), None),
        Route::CreateAlbum => (Active::Create(CreateAlbumScreen::new()), None),
        Route::Profile => match ctx.session.current().user {
            Some(user) => (
                Active::Profile(ProfileScreen::load(&ctx.gallery, user).await),
                None,
            ),
            None => (Active::Login(LoginScreen::new()), None),
        },
        Route::AlbumDetail { album_id, photo_id } => {
            let (screen, nav) =
                AlbumDetailScreen::load(&ctx.gallery, &album_id, photo_id.as_deref()).await;
            (Active::Album(screen), nav)
        }
        Route::PhotoViewer {
            photos,
            initial_index,
        } => {
            let mut screen = PhotoViewerScreen::new(photos, initial_index);
            screen.load_comments(&ctx.gallery).await;
            (Active::Viewer(screen), None)
        }
    }
}

fn render(active: &Active, state: &SessionState) -> String {
    let uid = state.user.as_ref().map(|u| u.uid.as_str()).unwrap_or("");
    match active {
        Active::None => "Loading...".into(),
        Active::Login(screen) => screen.render(),
        Active::Register(screen) => screen.render(),
        Active::Feed(screen) => screen.render(),
        Active::Album(screen) => screen.render(),
        Active::Viewer(screen) => screen.render(uid),
        Active::Create(screen) => screen.render(),
        Active::Profile(screen) => screen.render(),
    }
}

async fn dispatch(
    ctx: &AppContext,
    active: &mut Active,
    state: &SessionState,
    line: &str,
) -> Outcome {
    if line.is_empty() {
        return Outcome::Stay;
    }
    let (command, rest) = match line.split_once(' ') {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command {
        "quit" | "exit" => return Outcome::Quit,
        "feed" if state.user.is_some() => return Outcome::Nav(Nav::Tab(Tab::Feed)),
        "create" if state.user.is_some() => return Outcome::Nav(Nav::Tab(Tab::Create)),
        "profile" if state.user.is_some() => return Outcome::Nav(Nav::Tab(Tab::Profile)),
        "back" if state.user.is_some() => return Outcome::Nav(Nav::Back),
        _ => {}
    }

    let user = state.user.clone();
    match active {
        Active::None => Outcome::Stay,

        Active::Login(screen) => match command {
            "login" => {
                let mut parts = rest.split_whitespace();
                screen.email = parts.next().unwrap_or("").to_string();
                screen.password = parts.next().unwrap_or("").to_string();
                screen.submit(&ctx.session).await;
                if screen.error.is_none() {
                    wait_for_user(&ctx.session, true).await;
                }
                Outcome::Stay
            }
            "register" => Outcome::Nav(screen.go_register()),
            _ => unknown(command),
        },

        Active::Register(screen) => match command {
            "signup" => {
                let mut parts = rest.split_whitespace();
                screen.email = parts.next().unwrap_or("").to_string();
                screen.password = parts.next().unwrap_or("").to_string();
                screen.username = parts.next().unwrap_or("").to_string();
                screen.submit(&ctx.session).await;
                if screen.error.is_none() {
                    wait_for_user(&ctx.session, true).await;
                }
                Outcome::Stay
            }
            "login" => Outcome::Nav(screen.go_login()),
            _ => unknown(command),
        },

        Active::Feed(screen) => match command {
            "refresh" => {
                screen.refresh(&ctx.gallery).await;
                Outcome::Stay
            }
            _ => match parse_index(command) {
                Some(index) => screen.select(index).map_or(Outcome::Stay, Outcome::Nav),
                None => unknown(command),
            },
        },

        Active::Album(screen) => match command {
            "delete" => match with_user(&user) {
                Some(user) => report(screen.delete(&ctx.gallery, &user.uid).await),
                None => Outcome::Stay,
            },
            _ => match parse_index(command) {
                Some(index) => screen.select(index).map_or(Outcome::Stay, Outcome::Nav),
                None => unknown(command),
            },
        },

        Active::Viewer(screen) => match command {
            "next" => {
                screen.next();
                screen.load_comments(&ctx.gallery).await;
                Outcome::Stay
            }
            "prev" => {
                screen.prev();
                screen.load_comments(&ctx.gallery).await;
                Outcome::Stay
            }
            "like" => match with_user(&user) {
                Some(user) => {
                    if let Err(e) = screen.toggle_like(&ctx.gallery, &user.uid).await {
                        println!("Error: {e}");
                    }
                    Outcome::Stay
                }
                None => Outcome::Stay,
            },
            "comments" => {
                screen.load_comments(&ctx.gallery).await;
                Outcome::Stay
            }
            "comment" => match with_user(&user) {
                Some(user) => {
                    if let Err(e) = screen.add_comment(&ctx.gallery, &user.uid, rest).await {
                        println!("Error: {e}");
                    }
                    Outcome::Stay
                }
                None => Outcome::Stay,
            },
            "delcomment" => match (with_user(&user), parse_index(rest)) {
                (Some(user), Some(index)) => {
                    if let Err(e) = screen.delete_comment(&ctx.gallery, &user.uid, index).await {
                        println!("Error: {e}");
                    }
                    Outcome::Stay
                }
                _ => Outcome::Stay,
            },
            "delete" => match with_user(&user) {
                Some(user) => report(screen.delete_photo(&ctx.gallery, &user.uid).await),
                None => Outcome::Stay,
            },
            _ => unknown(command),
        },

        Active::Create(screen) => match command {
            "title" => {
                screen.title = rest.to_string();
                Outcome::Stay
            }
            "desc" => {
                screen.description = rest.to_string();
                Outcome::Stay
            }
            "add" => {
                let path = std::path::PathBuf::from(rest);
                let size = std::fs::metadata(&path).map(|m| m.len()).ok();
                let file_name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned());
                screen.pick_image(LocalImage {
                    path,
                    file_name,
                    size,
                });
                Outcome::Stay
            }
            "submit" => match with_user(&user) {
                Some(user) => report(screen.submit(&ctx.gallery, &user.uid).await),
                None => Outcome::Stay,
            },
            _ => unknown(command),
        },

        Active::Profile(screen) => match command {
            "albums" => {
                screen.tab = ProfileTab::Albums;
                Outcome::Stay
            }
            "photos" => {
                screen.tab = ProfileTab::Photos;
                Outcome::Stay
            }
            "refresh" => {
                screen.refresh(&ctx.gallery).await;
                Outcome::Stay
            }
            "logout" => {
                if let Err(e) = screen.logout(&ctx.session).await {
                    println!("Error: {e}");
                } else {
                    wait_for_user(&ctx.session, false).await;
                }
                Outcome::Stay
            }
            _ => match parse_index(command) {
                Some(index) => {
                    let nav = match screen.tab {
                        ProfileTab::Albums => screen.select_album(index),
                        ProfileTab::Photos => screen.select_photo(index),
                    };
                    nav.map_or(Outcome::Stay, Outcome::Nav)
                }
                None => unknown(command),
            },
        },
    }
}

fn with_user(user: &Option<SessionUser>) -> Option<&SessionUser> {
    if user.is_none() {
        println!("Not signed in");
    }
    user.as_ref()
}

fn report(result: Result<Nav, crate::error::AppError>) -> Outcome {
    match result {
        Ok(nav) => Outcome::Nav(nav),
        Err(e) => {
            println!("Error: {e}");
            Outcome::Stay
        }
    }
}

fn unknown(command: &str) -> Outcome {
    println!("Unknown command: {command}");
    Outcome::Stay
}

/// 1-based on screen, 0-based inside.
fn parse_index(input: &str) -> Option<usize> {
    input.parse::<usize>().ok().and_then(|n| n.checked_sub(1))
}

/// Wait briefly for the session merge task to observe a sign-in or
/// sign-out, so the next loop iteration renders the right flow.
async fn wait_for_user(session: &Session, present: bool) {
    let mut rx = session.subscribe();
    let _ = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            if rx.borrow_and_update().user.is_some() == present {
                break;
            }
            if rx.changed().await.is_err() {
                break;
            }
        }
    })
    .await;
}
