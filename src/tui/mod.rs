pub mod app;
pub mod event;
pub mod layout;

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::app::{AppContext, Result};
use crate::feed::{FeedController, FeedEvent, FeedState};

use self::app::{ActivePane, TuiApp};
use self::event::{Action, AppEvent, EventHandler};

type Tui = Terminal<CrosstermBackend<Stdout>>;

pub async fn run(ctx: Arc<AppContext>) -> Result<()> {
    let controller = FeedController::new(ctx.service.clone(), ctx.favorites.clone());
    controller.start();

    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, controller).await;
    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_app(terminal: &mut Tui, controller: Arc<FeedController>) -> Result<()> {
    let mut tui_app = TuiApp::new();
    let event_handler = EventHandler::new(Duration::from_millis(100));

    loop {
        let state = controller.snapshot();
        tui_app.clamp_selection(&state);
        terminal.draw(|frame| layout::render(frame, &tui_app, &state))?;

        match event_handler.next()? {
            AppEvent::Key(key) => {
                if tui_app.in_search_mode() {
                    handle_search_key(&mut tui_app, &controller, key);
                } else {
                    handle_action(&mut tui_app, &controller, &state, Action::from(key));
                }
            }
            AppEvent::Tick => {}
        }

        if tui_app.should_quit {
            break;
        }
    }

    Ok(())
}

/// While the search prompt is open every printable key edits the query
/// and re-dispatches the (debounced) search.
fn handle_search_key(app: &mut TuiApp, controller: &Arc<FeedController>, key: KeyEvent) {
    let Some(buffer) = app.search_input.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Esc => {
            app.search_input = None;
            controller.dispatch(FeedEvent::SearchBreeds(String::new()));
        }
        KeyCode::Enter => {
            app.search_input = None;
        }
        KeyCode::Backspace => {
            buffer.pop();
            controller.dispatch(FeedEvent::SearchBreeds(buffer.clone()));
        }
        KeyCode::Char(c) => {
            buffer.push(c);
            controller.dispatch(FeedEvent::SearchBreeds(buffer.clone()));
        }
        _ => {}
    }
}

fn handle_action(
    app: &mut TuiApp,
    controller: &Arc<FeedController>,
    state: &FeedState,
    action: Action,
) {
    match action {
        Action::Quit => {
            app.should_quit = true;
        }
        Action::MoveUp => {
            app.move_up(state);
        }
        Action::MoveDown => {
            // Scrolling onto the last loaded cat requests the next page
            if app.move_down(state) && state.has_more_data {
                controller.dispatch(FeedEvent::LoadMoreCats);
            }
        }
        Action::NextPane => {
            app.active_pane = app.active_pane.next();
        }
        Action::PrevPane => {
            app.active_pane = app.active_pane.prev();
        }
        Action::Select => match app.active_pane {
            ActivePane::Breeds => {
                if let Some(breed) = app.selected_breed(state).cloned() {
                    let already = state
                        .selected_breed
                        .as_ref()
                        .is_some_and(|b| b.id == breed.id);
                    let next = if already { None } else { Some(breed) };
                    controller.dispatch(FeedEvent::SelectBreed(next));
                }
            }
            ActivePane::Categories => {
                if let Some(category) = app.selected_category(state).cloned() {
                    let already = state
                        .selected_category
                        .as_ref()
                        .is_some_and(|c| c.id == category.id);
                    let next = if already { None } else { Some(category) };
                    controller.dispatch(FeedEvent::SelectCategory(next));
                }
            }
            ActivePane::Feed => {
                app.active_pane = ActivePane::Detail;
            }
            ActivePane::Detail => {}
        },
        Action::ToggleFavorite => {
            if let Some(cat) = app.selected_cat(state) {
                controller.dispatch(FeedEvent::ToggleFavorite(cat.id.clone()));
            }
        }
        Action::Refresh => {
            controller.dispatch(FeedEvent::Refresh);
        }
        Action::LoadMore => {
            controller.dispatch(FeedEvent::LoadMoreCats);
        }
        Action::CycleSize => {
            controller.dispatch(FeedEvent::ChangeImageSize(state.image_size.next()));
        }
        Action::ToggleBreedInfo => {
            controller.dispatch(FeedEvent::ToggleShowOnlyWithBreeds(
                !state.show_only_with_breeds,
            ));
        }
        Action::StartSearch => {
            app.active_pane = ActivePane::Breeds;
            app.search_input = Some(state.search_query.clone());
        }
        Action::ClearFilters => {
            controller.dispatch(FeedEvent::SelectBreed(None));
            controller.dispatch(FeedEvent::SelectCategory(None));
        }
        Action::OpenInBrowser => {
            if let Some(cat) = app.selected_cat(state) {
                if let Err(e) = open::that(&cat.image_url) {
                    app.set_status(format!("Failed to open browser: {}", e));
                }
            }
        }
        Action::DismissError => {
            controller.dispatch(FeedEvent::ClearError);
        }
        Action::None => {}
    }
}
