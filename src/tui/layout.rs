use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::feed::FeedState;
use crate::tui::app::{ActivePane, TuiApp};

pub fn render(frame: &mut Frame, app: &TuiApp, state: &FeedState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(32), Constraint::Min(40)])
        .split(frame.area());

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(8)])
        .split(columns[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45), // Feed pane
            Constraint::Min(8),         // Detail pane
            Constraint::Length(1),      // Status bar
        ])
        .split(columns[1]);

    render_breeds_pane(frame, app, state, left[0]);
    render_categories_pane(frame, app, state, left[1]);
    render_feed_pane(frame, app, state, right[0]);
    render_detail_pane(frame, app, state, right[1]);
    render_status_bar(frame, app, state, right[2]);
}

fn border_style(active: bool) -> Style {
    if active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn selection_style(selected: bool, active: bool) -> Option<Style> {
    if selected && active {
        Some(
            Style::default()
                .bg(Color::Cyan)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
    } else if selected {
        Some(Style::default().bg(Color::DarkGray))
    } else {
        None
    }
}

fn render_breeds_pane(frame: &mut Frame, app: &TuiApp, state: &FeedState, area: Rect) {
    let is_active = app.active_pane == ActivePane::Breeds;

    let items: Vec<ListItem> = state
        .breeds
        .iter()
        .enumerate()
        .map(|(i, breed)| {
            let is_filter = state
                .selected_breed
                .as_ref()
                .is_some_and(|b| b.id == breed.id);
            let marker = if is_filter { "●" } else { " " };
            let content = format!("{} {}", marker, breed.name);

            let style = selection_style(i == app.breed_index, is_active).unwrap_or_else(|| {
                if is_filter {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default()
                }
            });
            ListItem::new(content).style(style)
        })
        .collect();

    let title = match &app.search_input {
        Some(query) => format!(" Breeds /{}▏", query),
        None if state.is_searching => " Breeds (searching…) ".to_string(),
        None if !state.search_query.is_empty() => {
            format!(" Breeds ~{} ({}) ", state.search_query, state.breeds.len())
        }
        None => format!(" Breeds ({}) ", state.breeds.len()),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style(is_active));
    frame.render_widget(List::new(items).block(block), area);
}

fn render_categories_pane(frame: &mut Frame, app: &TuiApp, state: &FeedState, area: Rect) {
    let is_active = app.active_pane == ActivePane::Categories;

    let items: Vec<ListItem> = state
        .categories
        .iter()
        .enumerate()
        .map(|(i, category)| {
            let is_filter = state
                .selected_category
                .as_ref()
                .is_some_and(|c| c.id == category.id);
            let marker = if is_filter { "●" } else { " " };
            let content = format!("{} {}", marker, category.name);

            let style = selection_style(i == app.category_index, is_active).unwrap_or_else(|| {
                if is_filter {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default()
                }
            });
            ListItem::new(content).style(style)
        })
        .collect();

    let block = Block::default()
        .title(format!(" Categories ({}) ", state.categories.len()))
        .borders(Borders::ALL)
        .border_style(border_style(is_active));
    frame.render_widget(List::new(items).block(block), area);
}

fn render_feed_pane(frame: &mut Frame, app: &TuiApp, state: &FeedState, area: Rect) {
    let is_active = app.active_pane == ActivePane::Feed;

    let items: Vec<ListItem> = state
        .items
        .iter()
        .enumerate()
        .map(|(i, cat)| {
            let marker = if state.is_favorite(&cat.id) { "★" } else { " " };
            let breed = cat
                .primary_breed()
                .map(|b| b.name.as_str())
                .unwrap_or("(unknown breed)");
            let content = format!("{} {:<12} {}x{}  {}", marker, cat.id, cat.width, cat.height, breed);

            let style = selection_style(i == app.feed_index, is_active).unwrap_or_default();
            ListItem::new(content).style(style)
        })
        .collect();

    let more = if state.has_more_data { "+" } else { "" };
    let block = Block::default()
        .title(format!(" Cats ({}{}) ", state.items.len(), more))
        .borders(Borders::ALL)
        .border_style(border_style(is_active));
    frame.render_widget(List::new(items).block(block), area);
}

fn render_detail_pane(frame: &mut Frame, app: &TuiApp, state: &FeedState, area: Rect) {
    let is_active = app.active_pane == ActivePane::Detail;
    let block = Block::default()
        .title(" Detail ")
        .borders(Borders::ALL)
        .border_style(border_style(is_active));

    let Some(cat) = app.selected_cat(state) else {
        frame.render_widget(
            Paragraph::new("No cat selected").block(block),
            area,
        );
        return;
    };

    let mut lines: Vec<Line> = Vec::new();
    let favorite = if state.is_favorite(&cat.id) {
        " ★ favorite"
    } else {
        ""
    };
    lines.push(Line::from(vec![
        Span::styled(cat.id.clone(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!("  {}x{}{}", cat.width, cat.height, favorite)),
    ]));
    lines.push(Line::from(Span::styled(
        cat.image_url.clone(),
        Style::default().fg(Color::Blue),
    )));

    if !cat.categories.is_empty() {
        let names: Vec<&str> = cat.categories.iter().map(|c| c.name.as_str()).collect();
        lines.push(Line::from(format!("Categories: {}", names.join(", "))));
    }

    if let Some(breed) = cat.primary_breed() {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            breed.name.clone(),
            Style::default().fg(Color::Yellow),
        )));
        if let Some(origin) = &breed.origin {
            lines.push(Line::from(format!("Origin: {}", origin)));
        }
        if let Some(temperament) = &breed.temperament {
            lines.push(Line::from(format!("Temperament: {}", temperament)));
        }
        if let Some(life_span) = &breed.life_span {
            lines.push(Line::from(format!("Life span: {} years", life_span)));
        }
        if let Some(description) = &breed.description {
            lines.push(Line::raw(""));
            lines.push(Line::raw(description.clone()));
        }
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.detail_scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, app: &TuiApp, state: &FeedState, area: Rect) {
    let (content, style) = if let Some(error) = &state.error_message {
        (
            format!(" {} (Esc to dismiss)", error),
            Style::default().fg(Color::White).bg(Color::Red),
        )
    } else if let Some(message) = &app.status_message {
        (
            format!(" {}", message),
            Style::default().fg(Color::White).bg(Color::DarkGray),
        )
    } else {
        let activity = if state.phase.is_loading_initial() {
            "Loading… | "
        } else if state.phase.is_loading_more() {
            "Loading more… | "
        } else {
            ""
        };
        (
            format!(
                " {}{} | {} cats | /search f:fav R:refresh s:size b:breed-info c:clear q:quit",
                activity,
                state.filter_summary(),
                state.total_cats_loaded
            ),
            Style::default().fg(Color::White).bg(Color::DarkGray),
        )
    };

    frame.render_widget(Paragraph::new(content).style(style), area);
}
