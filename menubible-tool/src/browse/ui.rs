use menubible_core::{
    AssetUploader, CategoryPage, HomeRow, ItemDetail, ItemStore, Palette, PriceDisplay, Rgb, catalog,
};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use super::app::{AppMode, BrowseApp, Content, FormField, FormState, ToastKind};

fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

fn base(palette: &Palette) -> Style {
    Style::default().fg(color(palette.text_main)).bg(color(palette.background))
}

fn muted(palette: &Palette) -> Style {
    Style::default().fg(color(palette.text_muted))
}

fn accent(palette: &Palette) -> Style {
    Style::default().fg(color(palette.accent)).add_modifier(Modifier::BOLD)
}

fn bordered<'a>(palette: &Palette, title: impl Into<Line<'a>>) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color(palette.border)))
        .title(title)
}

pub fn render<S, U>(frame: &mut Frame, app: &BrowseApp<S, U>)
where
    S: ItemStore + 'static,
    U: AssetUploader + 'static,
{
    let palette = app.palette();
    frame.render_widget(Block::default().style(base(palette)), frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(1),    // Body
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    match app.mode {
        AppMode::Search => render_search(frame, app, chunks[1]),
        AppMode::Form => {
            if let Some(form) = &app.form {
                render_form(frame, palette, form, chunks[1]);
            }
        }
        _ => render_content(frame, app, chunks[1]),
    }
    render_status_bar(frame, app, chunks[2]);

    match app.mode {
        AppMode::SelectCategory => render_category_popup(frame, app),
        AppMode::Login => render_login_popup(frame, app),
        AppMode::ConfirmDelete => render_confirm_popup(frame, app),
        _ => {}
    }

    render_toast(frame, app, chunks[1]);
}

fn render_header<S, U>(frame: &mut Frame, app: &BrowseApp<S, U>, area: Rect)
where
    S: ItemStore + 'static,
    U: AssetUploader + 'static,
{
    let palette = app.palette();
    let mut spans = vec![
        Span::styled("Menu Bible", accent(palette)),
        Span::styled(format!("  {}", app.route), muted(palette)),
    ];
    if app.session.is_admin() {
        spans.push(Span::styled("  [ADMIN]", Style::default().fg(color(palette.error))));
    }
    if app.simple {
        spans.push(Span::styled("  [simple]", muted(palette)));
    }
    spans.push(Span::styled(format!("  theme: {}", palette.name), muted(palette)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_content<S, U>(frame: &mut Frame, app: &BrowseApp<S, U>, area: Rect)
where
    S: ItemStore + 'static,
    U: AssetUploader + 'static,
{
    let palette = app.palette();
    match &app.content {
        Content::Loading => {
            let loading = Paragraph::new("Loading...")
                .style(muted(palette).add_modifier(Modifier::ITALIC))
                .block(bordered(palette, ""));
            frame.render_widget(loading, area);
        }
        Content::Home(rows) => render_home(frame, app, rows, area),
        Content::Category(page) => render_category(frame, app, page, area),
        Content::Item(item) => {
            let detail = ItemDetail::new(item, app.simple);
            render_detail(frame, palette, &detail, area);
        }
    }
}

fn render_home<S, U>(frame: &mut Frame, app: &BrowseApp<S, U>, rows: &[HomeRow], area: Rect)
where
    S: ItemStore + 'static,
    U: AssetUploader + 'static,
{
    let palette = app.palette();
    if rows.is_empty() {
        let empty = Paragraph::new("Nothing on the menu yet. Press m for categories.")
            .style(muted(palette))
            .block(bordered(palette, "Home"));
        frame.render_widget(empty, area);
        return;
    }

    let constraints: Vec<Constraint> = rows.iter().map(|_| Constraint::Length(4)).chain([Constraint::Min(0)]).collect();
    let areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (index, row) in rows.iter().enumerate() {
        let is_row_selected = index == app.selected_row;
        let mut cards: Vec<Span> = Vec::new();
        for (col, item) in row.items.iter().enumerate() {
            if col > 0 {
                cards.push(Span::styled(" │ ", muted(palette)));
            }
            let label = format!("{} ({})", item.name, PriceDisplay::for_item(item));
            let style = if is_row_selected && col == app.selected {
                accent(palette).add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            cards.push(Span::styled(label, style));
        }

        let title = format!(" {} {} ", row.spec.icon().glyph(), row.spec.title);
        let title_style = if is_row_selected { accent(palette) } else { Style::default() };
        let text = Text::from(vec![
            Line::from(Span::styled(row.spec.description(), muted(palette))),
            Line::from(cards),
        ]);
        let widget = Paragraph::new(text).block(bordered(palette, Span::styled(title, title_style)));
        frame.render_widget(widget, areas[index]);
    }
}

fn render_category<S, U>(frame: &mut Frame, app: &BrowseApp<S, U>, page: &CategoryPage, area: Rect)
where
    S: ItemStore + 'static,
    U: AssetUploader + 'static,
{
    let palette = app.palette();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(1)])
        .split(area);

    let chips: Vec<Span> = page
        .chips()
        .into_iter()
        .flat_map(|chip| {
            let style = if chip == page.selected_chip() {
                accent(palette).add_modifier(Modifier::REVERSED)
            } else {
                muted(palette)
            };
            [Span::styled(format!(" {} ", chip), style), Span::raw(" ")]
        })
        .collect();

    let header = Text::from(vec![
        Line::from(Span::styled(page.description(), Style::default())),
        Line::from(chips),
        Line::from(Span::styled(page.background(), muted(palette))),
    ]);
    let title = format!(" {} {} ", page.icon().glyph(), page.title());
    frame.render_widget(
        Paragraph::new(header)
            .wrap(Wrap { trim: true })
            .block(bordered(palette, Span::styled(title, accent(palette)))),
        chunks[0],
    );

    let displayed = page.displayed();
    let items: Vec<ListItem> = displayed
        .iter()
        .map(|item| {
            let mut spans = vec![
                Span::styled(item.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw("  "),
                Span::styled(PriceDisplay::for_item(item).to_string(), accent(palette)),
            ];
            if !item.types.is_empty() {
                spans.push(Span::styled(format!("  {}", item.types.join(" · ")), muted(palette)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list_title = if displayed.is_empty() { "No items" } else { "Items" };
    let list = List::new(items)
        .block(bordered(palette, list_title))
        .highlight_style(Style::default().bg(color(palette.card)).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if !displayed.is_empty() {
        state.select(Some(app.selected));
    }
    frame.render_stateful_widget(list, chunks[1], &mut state);
}

fn render_detail(frame: &mut Frame, palette: &Palette, detail: &ItemDetail, area: Rect) {
    let heading = Style::default().fg(color(palette.accent)).add_modifier(Modifier::BOLD);
    let mut lines: Vec<Line> = Vec::new();

    if !detail.types.is_empty() {
        lines.push(Line::from(Span::styled(detail.types.join(" · "), muted(palette))));
    }
    lines.push(Line::from(Span::styled(detail.price.to_string(), heading)));
    if let Some(body) = &detail.body {
        lines.push(Line::from(Span::styled(body.clone(), muted(palette))));
    }
    if let Some(description) = &detail.description {
        lines.push(Line::from(""));
        lines.push(Line::from(description.clone()));
    }
    if !detail.ingredients.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Ingredients", heading)));
        for ingredient in &detail.ingredients {
            lines.push(Line::from(format!("  • {}", ingredient)));
        }
    }
    if let Some(notes) = &detail.notes {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Notes", heading)));
        lines.push(Line::from(format!("  {}", notes)));
    }
    if !detail.allergens.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Allergens", heading)));
        let tags: Vec<Span> = detail
            .allergens
            .iter()
            .map(|tag| {
                Span::styled(
                    format!(" {} {} ", tag.icon.glyph(), tag.label),
                    Style::default().fg(color(palette.error)),
                )
            })
            .collect();
        lines.push(Line::from(tags));
    }
    if !detail.trivia.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Did you know?", heading)));
        for sentence in &detail.trivia {
            lines.push(Line::from(format!("  {}.", sentence)));
        }
    }
    if let Some(image) = &detail.image {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!("Image: {}", image), muted(palette))));
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: false })
        .block(bordered(palette, Span::styled(format!(" {} ", detail.name), heading)));
    frame.render_widget(paragraph, area);
}

fn render_search<S, U>(frame: &mut Frame, app: &BrowseApp<S, U>, area: Rect)
where
    S: ItemStore + 'static,
    U: AssetUploader + 'static,
{
    let palette = app.palette();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    let input = Paragraph::new(app.search_input.as_str())
        .style(Style::default().bg(color(palette.input)))
        .block(bordered(palette, format!("Search by {}", app.search_mode)));
    frame.render_widget(input, chunks[0]);
    frame.set_cursor_position((
        chunks[0].x + 1 + app.search_input.chars().count() as u16,
        chunks[0].y + 1,
    ));

    let items: Vec<ListItem> = app
        .search_results
        .iter()
        .map(|item| {
            ListItem::new(Line::from(vec![
                Span::styled(item.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(
                    format!("  {}", catalog::display_name(&item.sub_category)),
                    muted(palette),
                ),
            ]))
        })
        .collect();

    let title = if app.search_input.is_empty() {
        "Type to search"
    } else if app.search_results.is_empty() {
        "No results"
    } else {
        "Results"
    };
    let list = List::new(items)
        .block(bordered(palette, title))
        .highlight_style(Style::default().bg(color(palette.card)).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if !app.search_results.is_empty() {
        state.select(Some(app.selected));
    }
    frame.render_stateful_widget(list, chunks[1], &mut state);
}

fn render_form(frame: &mut Frame, palette: &Palette, form: &FormState, area: Rect) {
    let current = form.current();
    let mut lines: Vec<Line> = Vec::new();

    for field in form.fields() {
        let is_current = field == current;
        let label_style = if is_current { accent(palette) } else { muted(palette) };
        let mut spans = vec![Span::styled(format!("{:>13}: ", field.label()), label_style)];

        match field {
            FormField::Types => {
                for (i, chip) in form.draft.available_types().iter().enumerate() {
                    let on = form.draft.types.iter().any(|t| t == chip);
                    let mut style = if on {
                        Style::default().fg(color(palette.success)).add_modifier(Modifier::BOLD)
                    } else {
                        muted(palette)
                    };
                    if is_current && i == form.chip_cursor {
                        style = style.add_modifier(Modifier::REVERSED);
                    }
                    let marker = if on { "✓" } else { " " };
                    spans.push(Span::styled(format!("[{}{}] ", marker, chip), style));
                }
            }
            FormField::Body => {
                let value = form.value(field);
                spans.push(Span::raw(if value.is_empty() { "‹ none ›".to_string() } else { format!("‹ {} ›", value) }));
            }
            _ => {
                let value = form.value(field);
                let style = if is_current {
                    Style::default().bg(color(palette.input))
                } else {
                    Style::default()
                };
                spans.push(Span::styled(value, style));
                if is_current {
                    spans.push(Span::styled("▏", accent(palette)));
                }
            }
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(""));
    if form.saving {
        lines.push(Line::from(Span::styled("Saving...", muted(palette).add_modifier(Modifier::ITALIC))));
    }
    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(
            format!("Error: {}", error),
            Style::default().fg(color(palette.error)),
        )));
    }

    let title = match &form.mode {
        menubible_core::FormMode::Create => format!(" Add to {} ", catalog::display_name(&form.draft.sub_category)),
        menubible_core::FormMode::Edit(_) => format!(" Edit {} ", form.draft.name),
    };
    let paragraph = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: false })
        .block(bordered(palette, Span::styled(title, accent(palette))));
    frame.render_widget(paragraph, area);
}

fn render_status_bar<S, U>(frame: &mut Frame, app: &BrowseApp<S, U>, area: Rect)
where
    S: ItemStore + 'static,
    U: AssetUploader + 'static,
{
    let status = match app.mode {
        AppMode::Browse => match (&app.content, app.session.is_admin()) {
            (Content::Item(_), true) => "e: Edit  d: Delete  s: Simple  Esc: Back  l: Logout  q: Quit",
            (Content::Item(_), false) => "s: Simple  Esc: Back  /: Search  a: Admin  q: Quit",
            (Content::Category(_), true) => "←/→: Filter  ↑/↓: Select  Enter: Open  a: Add  m: Menu  Esc: Back  q: Quit",
            (Content::Category(_), false) => "←/→: Filter  ↑/↓: Select  Enter: Open  m: Menu  /: Search  Esc: Back  q: Quit",
            _ => "↑/↓: Row  ←/→: Item  Enter: Open  m: Menu  /: Search  t: Theme  a: Admin  q: Quit",
        },
        AppMode::SelectCategory => "↑/↓: Navigate  Enter: Open  Esc: Cancel",
        AppMode::Search => "Tab: Mode  ↑/↓: Select  Enter: Open  Esc: Close",
        AppMode::Login => "Enter: Unlock  Esc: Cancel",
        AppMode::Form => "↑/↓: Field  ←/→: Choose  Space: Toggle type  Ctrl+S: Save  Esc: Cancel",
        AppMode::ConfirmDelete => "y: Delete  n: Keep",
    };

    frame.render_widget(Paragraph::new(status).style(muted(app.palette())), area);
}

fn render_category_popup<S, U>(frame: &mut Frame, app: &BrowseApp<S, U>)
where
    S: ItemStore + 'static,
    U: AssetUploader + 'static,
{
    let palette = app.palette();
    let items: Vec<ListItem> = catalog::categories()
        .map(|category| {
            let section = catalog::section_of(category).unwrap_or_default();
            ListItem::new(Line::from(vec![
                Span::raw(format!("{} {}", catalog::icon(category).glyph(), catalog::display_name(category))),
                Span::styled(format!("  {}", section), muted(palette)),
            ]))
        })
        .collect();

    let area = centered_rect(40, 70, frame.area());
    frame.render_widget(Clear, area);

    let list = List::new(items)
        .block(bordered(palette, "Categories").style(base(palette)))
        .highlight_style(Style::default().bg(color(palette.card)).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.popup_selected));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_login_popup<S, U>(frame: &mut Frame, app: &BrowseApp<S, U>)
where
    S: ItemStore + 'static,
    U: AssetUploader + 'static,
{
    let palette = app.palette();
    let area = centered_rect(30, 20, frame.area());
    frame.render_widget(Clear, area);

    let masked = "•".repeat(app.login_input.chars().count());
    let popup = Paragraph::new(masked)
        .style(base(palette))
        .block(bordered(palette, "Admin passcode"));
    frame.render_widget(popup, area);
}

fn render_confirm_popup<S, U>(frame: &mut Frame, app: &BrowseApp<S, U>)
where
    S: ItemStore + 'static,
    U: AssetUploader + 'static,
{
    let palette = app.palette();
    let name = match &app.content {
        Content::Item(item) => item.name.as_str(),
        _ => "this item",
    };
    let area = centered_rect(40, 20, frame.area());
    frame.render_widget(Clear, area);

    let popup = Paragraph::new(format!("Delete \"{}\"? This cannot be undone. (y/n)", name))
        .wrap(Wrap { trim: true })
        .style(base(palette))
        .block(bordered(palette, Span::styled("Confirm delete", Style::default().fg(color(palette.error)))));
    frame.render_widget(popup, area);
}

fn render_toast<S, U>(frame: &mut Frame, app: &BrowseApp<S, U>, area: Rect)
where
    S: ItemStore + 'static,
    U: AssetUploader + 'static,
{
    let Some(toast) = &app.toast else {
        return;
    };
    let palette = app.palette();
    let width = (toast.message.chars().count() as u16 + 4).min(area.width);
    let toast_area = Rect {
        x: area.x + area.width.saturating_sub(width),
        y: area.y + area.height.saturating_sub(3),
        width,
        height: 3.min(area.height),
    };
    let fg = match toast.kind {
        ToastKind::Success => palette.success,
        ToastKind::Error => palette.error,
    };

    frame.render_widget(Clear, toast_area);
    let widget = Paragraph::new(toast.message.as_str())
        .style(base(palette).fg(color(fg)))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(color(fg))));
    frame.render_widget(widget, toast_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
