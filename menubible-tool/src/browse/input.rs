use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use menubible_core::{AssetUploader, ItemStore};

use super::app::{AppMode, BrowseApp};

pub fn handle_event<S, U>(app: &mut BrowseApp<S, U>, event: Event)
where
    S: ItemStore + 'static,
    U: AssetUploader + 'static,
{
    if let Event::Key(key) = event {
        if key.kind == KeyEventKind::Press {
            handle_key(app, key);
        }
    }
}

fn handle_key<S, U>(app: &mut BrowseApp<S, U>, key: KeyEvent)
where
    S: ItemStore + 'static,
    U: AssetUploader + 'static,
{
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }
    match app.mode {
        AppMode::Browse => handle_browse_key(app, key),
        AppMode::SelectCategory => handle_popup_key(app, key),
        AppMode::Search => handle_search_key(app, key),
        AppMode::Login => handle_login_key(app, key),
        AppMode::Form => handle_form_key(app, key),
        AppMode::ConfirmDelete => handle_confirm_key(app, key),
    }
}

fn handle_browse_key<S, U>(app: &mut BrowseApp<S, U>, key: KeyEvent)
where
    S: ItemStore + 'static,
    U: AssetUploader + 'static,
{
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Esc | KeyCode::Backspace => app.back(),
        KeyCode::Up => app.select_up(),
        KeyCode::Down => app.select_down(),
        KeyCode::Left => app.select_side(false),
        KeyCode::Right => app.select_side(true),
        KeyCode::Enter => app.open_selected(),
        KeyCode::Char('m') => app.open_category_picker(),
        KeyCode::Char('/') => app.open_search(),
        KeyCode::Char('h') => app.navigate(menubible_core::Route::Home),
        KeyCode::Char('t') => app.toggle_theme(),
        KeyCode::Char('s') => app.toggle_simple(),
        KeyCode::Char('r') => app.refresh(),
        KeyCode::Char('a') if app.session.is_admin() => app.open_add_form(),
        KeyCode::Char('a') => app.open_login(),
        KeyCode::Char('e') => app.open_edit_form(),
        KeyCode::Char('d') => app.request_delete(),
        KeyCode::Char('l') => app.logout(),
        _ => {}
    }
}

fn handle_popup_key<S, U>(app: &mut BrowseApp<S, U>, key: KeyEvent)
where
    S: ItemStore + 'static,
    U: AssetUploader + 'static,
{
    match key.code {
        KeyCode::Esc => app.close_popup(),
        KeyCode::Enter => app.popup_select(),
        KeyCode::Up => app.select_up(),
        KeyCode::Down => app.select_down(),
        _ => {}
    }
}

fn handle_search_key<S, U>(app: &mut BrowseApp<S, U>, key: KeyEvent)
where
    S: ItemStore + 'static,
    U: AssetUploader + 'static,
{
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => app.close_search(),
        (KeyCode::Enter, _) => app.open_selected(),
        (KeyCode::Tab, _) => app.cycle_search_mode(),
        (KeyCode::Up, _) => app.select_up(),
        (KeyCode::Down, _) => app.select_down(),
        (KeyCode::Backspace, _) => app.search_backspace(),
        (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => app.search_char(c),
        _ => {}
    }
}

fn handle_login_key<S, U>(app: &mut BrowseApp<S, U>, key: KeyEvent)
where
    S: ItemStore + 'static,
    U: AssetUploader + 'static,
{
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => {
            app.login_input.clear();
            app.close_popup();
        }
        (KeyCode::Enter, _) => app.submit_login(),
        (KeyCode::Backspace, _) => {
            app.login_input.pop();
        }
        (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => app.login_input.push(c),
        _ => {}
    }
}

fn handle_form_key<S, U>(app: &mut BrowseApp<S, U>, key: KeyEvent)
where
    S: ItemStore + 'static,
    U: AssetUploader + 'static,
{
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => app.cancel_form(),
        (KeyCode::Char('s'), KeyModifiers::CONTROL) | (KeyCode::F(2), _) => app.submit_form(),
        _ => {
            let Some(form) = app.form.as_mut() else {
                return;
            };
            match (key.code, key.modifiers) {
                (KeyCode::Up, _) | (KeyCode::BackTab, _) => form.prev_field(),
                (KeyCode::Down, _) | (KeyCode::Tab, _) | (KeyCode::Enter, _) => form.next_field(),
                (KeyCode::Left, _) => form.cycle(false),
                (KeyCode::Right, _) => form.cycle(true),
                (KeyCode::Backspace, _) => form.input_backspace(),
                (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => form.input_char(c),
                _ => {}
            }
        }
    }
}

fn handle_confirm_key<S, U>(app: &mut BrowseApp<S, U>, key: KeyEvent)
where
    S: ItemStore + 'static,
    U: AssetUploader + 'static,
{
    match key.code {
        KeyCode::Char('y') | KeyCode::Enter => app.confirm_delete(),
        KeyCode::Char('n') | KeyCode::Esc => app.close_popup(),
        _ => {}
    }
}
