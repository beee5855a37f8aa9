use std::sync::Arc;
use std::time::{Duration, Instant};

use menubible_core::{
    AdminGate, AssetUploader, Body, CategoryPage, FormMode, HomeRow, ImageRef, ItemDraft, ItemId,
    ItemStore, MenuItem, PendingImage, RandomShuffle, Route, SearchMode, Session, Shuffle,
    SubmitOutcome, ThemeName, ThemeProvider, catalog, load_home_rows, search,
};
use tokio::sync::mpsc;
use tracing::{debug, info};

pub const TOAST_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Browse,
    SelectCategory,
    Search,
    Login,
    Form,
    ConfirmDelete,
}

/// What the current route has loaded so far.
#[derive(Debug)]
pub enum Content {
    /// Also the state of an item id that does not exist.
    Loading,
    Home(Vec<HomeRow>),
    Category(CategoryPage),
    Item(MenuItem),
}

#[derive(Debug)]
pub enum Response {
    Home(Result<Vec<HomeRow>, String>),
    Category(Result<CategoryPage, String>),
    Item(Result<Option<MenuItem>, String>),
    Search(Result<Vec<MenuItem>, String>),
    Saved(Result<SubmitOutcome, String>),
    Deleted(Result<ItemId, String>),
}

/// A response tagged with the generation of the request that produced it.
#[derive(Debug)]
pub struct Tagged {
    pub generation: u64,
    pub response: Response,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub shown_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Price,
    Glass,
    Bottle,
    Types,
    Body,
    Description,
    Ingredients,
    Notes,
    Allergens,
    Trivia,
    Image,
}

impl FormField {
    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Price => "Price",
            FormField::Glass => "Glass price",
            FormField::Bottle => "Bottle price",
            FormField::Types => "Types",
            FormField::Body => "Body",
            FormField::Description => "Description",
            FormField::Ingredients => "Ingredients",
            FormField::Notes => "Notes",
            FormField::Allergens => "Allergens",
            FormField::Trivia => "Trivia",
            FormField::Image => "Image",
        }
    }
}

pub struct FormState {
    pub mode: FormMode,
    pub draft: ItemDraft,
    pub field: usize,
    pub chip_cursor: usize,
    /// URL or local path as typed. Applied to the draft on submit.
    pub image_input: String,
    pub error: Option<String>,
    pub saving: bool,
}

impl FormState {
    pub fn create(category: &str) -> Self {
        Self::with_draft(FormMode::Create, ItemDraft::new(category))
    }

    pub fn edit(item: &MenuItem) -> Self {
        Self::with_draft(FormMode::Edit(item.id.clone()), ItemDraft::from_item(item))
    }

    fn with_draft(mode: FormMode, draft: ItemDraft) -> Self {
        let image_input = draft.image.url().unwrap_or_default().to_string();
        Self {
            mode,
            draft,
            field: 0,
            chip_cursor: 0,
            image_input,
            error: None,
            saving: false,
        }
    }

    /// Visible fields. Pricing and body follow the draft's types and category.
    pub fn fields(&self) -> Vec<FormField> {
        let mut fields = vec![FormField::Name];
        if self.draft.is_housepouring() {
            fields.extend([FormField::Glass, FormField::Bottle]);
        } else {
            fields.push(FormField::Price);
        }
        if !self.draft.available_types().is_empty() {
            fields.push(FormField::Types);
        }
        if self.draft.takes_body() {
            fields.push(FormField::Body);
        }
        fields.extend([
            FormField::Description,
            FormField::Ingredients,
            FormField::Notes,
            FormField::Allergens,
            FormField::Trivia,
            FormField::Image,
        ]);
        fields
    }

    pub fn current(&self) -> FormField {
        let fields = self.fields();
        fields[self.field.min(fields.len() - 1)]
    }

    pub fn next_field(&mut self) {
        self.field = (self.field + 1).min(self.fields().len() - 1);
        self.chip_cursor = 0;
    }

    pub fn prev_field(&mut self) {
        self.field = self.field.saturating_sub(1);
        self.chip_cursor = 0;
    }

    pub fn text_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::Name => Some(&mut self.draft.name),
            FormField::Price => Some(&mut self.draft.price),
            FormField::Glass => Some(&mut self.draft.price_glass),
            FormField::Bottle => Some(&mut self.draft.price_bottle),
            FormField::Description => Some(&mut self.draft.description),
            FormField::Ingredients => Some(&mut self.draft.ingredients),
            FormField::Notes => Some(&mut self.draft.method),
            FormField::Allergens => Some(&mut self.draft.allergens),
            FormField::Trivia => Some(&mut self.draft.trivia),
            FormField::Image => Some(&mut self.image_input),
            FormField::Types | FormField::Body => None,
        }
    }

    pub fn value(&self, field: FormField) -> String {
        match field {
            FormField::Name => self.draft.name.clone(),
            FormField::Price => self.draft.price.clone(),
            FormField::Glass => self.draft.price_glass.clone(),
            FormField::Bottle => self.draft.price_bottle.clone(),
            FormField::Description => self.draft.description.clone(),
            FormField::Ingredients => self.draft.ingredients.clone(),
            FormField::Notes => self.draft.method.clone(),
            FormField::Allergens => self.draft.allergens.clone(),
            FormField::Trivia => self.draft.trivia.clone(),
            FormField::Image => self.image_input.clone(),
            FormField::Types => self.draft.types.join(", "),
            FormField::Body => self.draft.body.map(|b| b.label().to_string()).unwrap_or_default(),
        }
    }

    pub fn input_char(&mut self, c: char) {
        let field = self.current();
        match field {
            FormField::Types if c == ' ' => self.toggle_chip(),
            _ => {
                if let Some(text) = self.text_mut(field) {
                    text.push(c);
                }
            }
        }
    }

    pub fn input_backspace(&mut self) {
        let field = self.current();
        if let Some(text) = self.text_mut(field) {
            text.pop();
        }
    }

    /// Left/right on a choice field.
    pub fn cycle(&mut self, forward: bool) {
        match self.current() {
            FormField::Types => {
                let count = self.draft.available_types().len();
                if count > 0 {
                    self.chip_cursor = if forward {
                        (self.chip_cursor + 1) % count
                    } else {
                        (self.chip_cursor + count - 1) % count
                    };
                }
            }
            FormField::Body => {
                let options: Vec<Option<Body>> =
                    std::iter::once(None).chain(Body::ALL.into_iter().map(Some)).collect();
                let pos = options.iter().position(|b| *b == self.draft.body).unwrap_or(0);
                let next = if forward {
                    (pos + 1) % options.len()
                } else {
                    (pos + options.len() - 1) % options.len()
                };
                self.draft.body = options[next];
            }
            _ => {}
        }
    }

    pub fn toggle_chip(&mut self) {
        if let Some(label) = self.draft.available_types().get(self.chip_cursor) {
            self.draft.toggle_type(label);
        }
        // The field list may have changed shape; keep the cursor on Types.
        if let Some(pos) = self.fields().iter().position(|f| *f == FormField::Types) {
            self.field = pos;
        }
    }

    /// Moves the typed image text into the draft.
    pub fn apply_image(&mut self) {
        let input = self.image_input.trim();
        self.draft.image = if input.is_empty() {
            ImageRef::None
        } else if self.draft.image.url() == Some(input) {
            return;
        } else if input.starts_with("http://") || input.starts_with("https://") {
            ImageRef::Remote(input.to_string())
        } else {
            ImageRef::Pending(PendingImage::new(input))
        };
    }
}

pub struct BrowseApp<S, U> {
    pub mode: AppMode,
    pub should_quit: bool,
    pub store: Arc<S>,
    pub uploader: Arc<U>,
    pub gate: AdminGate,
    pub session: Session,
    pub theme: ThemeProvider,
    pub route: Route,
    pub history: Vec<Route>,
    pub content: Content,
    pub simple: bool,

    // Selection state
    pub selected_row: usize,
    pub selected: usize,
    pub chip_index: usize,
    pub popup_selected: usize,

    pub search_input: String,
    pub search_mode: SearchMode,
    pub search_results: Vec<MenuItem>,
    pub login_input: String,
    pub form: Option<FormState>,
    pub toast: Option<Toast>,
    pub shuffle: fn(&mut [MenuItem]),

    generation: u64,
    search_generation: u64,
    tx: mpsc::UnboundedSender<Tagged>,
    rx: mpsc::UnboundedReceiver<Tagged>,
}

fn random_shuffle(items: &mut [MenuItem]) {
    RandomShuffle.shuffle(items);
}

impl<S, U> BrowseApp<S, U>
where
    S: ItemStore + 'static,
    U: AssetUploader + 'static,
{
    pub fn new(store: Arc<S>, uploader: Arc<U>, gate: AdminGate, theme: ThemeName) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            mode: AppMode::Browse,
            should_quit: false,
            store,
            uploader,
            gate,
            session: Session::new(),
            theme: ThemeProvider::new(theme),
            route: Route::Home,
            history: Vec::new(),
            content: Content::Loading,
            simple: false,
            selected_row: 0,
            selected: 0,
            chip_index: 0,
            popup_selected: 0,
            search_input: String::new(),
            search_mode: SearchMode::default(),
            search_results: Vec::new(),
            login_input: String::new(),
            form: None,
            toast: None,
            shuffle: random_shuffle,
            generation: 0,
            search_generation: 0,
            tx,
            rx,
        }
    }

    #[cfg(test)]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    // Navigation

    pub fn navigate(&mut self, route: Route) {
        let previous = std::mem::replace(&mut self.route, route.clone());
        self.history.push(previous);
        self.load(route);
    }

    pub fn back(&mut self) {
        match self.history.pop() {
            Some(route) => self.load(route),
            None => self.should_quit = true,
        }
    }

    pub fn refresh(&mut self) {
        self.load(self.route.clone());
    }

    /// Shows `route` and fetches its content. Responses to earlier loads are dropped.
    pub fn load(&mut self, route: Route) {
        self.route = route.clone();
        self.content = Content::Loading;
        self.selected_row = 0;
        self.selected = 0;
        self.chip_index = 0;
        self.generation += 1;

        let generation = self.generation;
        let store = Arc::clone(&self.store);
        let tx = self.tx.clone();
        debug!(%route, generation, "Loading route");

        match route {
            Route::Home => {
                let mut shuffle = self.shuffle;
                tokio::spawn(async move {
                    let result = load_home_rows(&*store, &mut shuffle).await;
                    let response = Response::Home(result.map_err(|e| e.to_string()));
                    let _ = tx.send(Tagged { generation, response });
                });
            }
            Route::Category(name) => {
                tokio::spawn(async move {
                    let result = CategoryPage::load(&*store, &name).await;
                    let response = Response::Category(result.map_err(|e| e.to_string()));
                    let _ = tx.send(Tagged { generation, response });
                });
            }
            Route::Item(id) => {
                tokio::spawn(async move {
                    let result = store.get(&id).await;
                    let response = Response::Item(result.map_err(|e| e.to_string()));
                    let _ = tx.send(Tagged { generation, response });
                });
            }
        }
    }

    /// Drains finished requests and expires the toast.
    pub fn poll_responses(&mut self) {
        while let Ok(tagged) = self.rx.try_recv() {
            self.apply(tagged);
        }
        self.expire_toast(Instant::now());
    }

    /// Waits for the next response. Used where there is no render loop.
    #[cfg(test)]
    pub async fn next_response(&mut self) {
        if let Some(tagged) = self.rx.recv().await {
            self.apply(tagged);
        }
    }

    #[cfg(test)]
    pub fn sender(&self) -> mpsc::UnboundedSender<Tagged> {
        self.tx.clone()
    }

    pub fn apply(&mut self, tagged: Tagged) {
        let Tagged { generation, response } = tagged;
        match response {
            Response::Home(_) | Response::Category(_) | Response::Item(_)
                if generation != self.generation =>
            {
                debug!(generation, current = self.generation, "Dropping stale response");
            }
            Response::Search(_) if generation != self.search_generation => {
                debug!(generation, current = self.search_generation, "Dropping stale search");
            }
            Response::Home(Ok(rows)) => self.content = Content::Home(rows),
            Response::Category(Ok(page)) => self.content = Content::Category(page),
            Response::Item(Ok(Some(item))) => self.content = Content::Item(item),
            Response::Item(Ok(None)) => debug!(route = %self.route, "Item not found"),
            Response::Home(Err(e)) | Response::Category(Err(e)) | Response::Item(Err(e)) => {
                self.show_error(format!("Could not load menu: {}", e));
            }
            Response::Search(Ok(results)) => {
                self.search_results = results;
                self.selected = 0;
            }
            Response::Search(Err(e)) => self.show_error(format!("Search failed: {}", e)),
            Response::Saved(Ok(outcome)) => {
                let message = match outcome {
                    SubmitOutcome::Created(_) => "Item added",
                    SubmitOutcome::Updated(_) => "Item updated",
                };
                self.form = None;
                self.mode = AppMode::Browse;
                self.show_success(message);
                self.refresh();
            }
            Response::Saved(Err(e)) => {
                if let Some(form) = &mut self.form {
                    form.saving = false;
                    form.error = Some(e.clone());
                }
                self.show_error(format!("Save failed: {}", e));
            }
            Response::Deleted(Ok(id)) => {
                info!(%id, "Item removed from view");
                self.mode = AppMode::Browse;
                self.show_success("Item deleted");
                self.back_or_home();
            }
            Response::Deleted(Err(e)) => {
                self.mode = AppMode::Browse;
                self.show_error(format!("Delete failed: {}", e));
            }
        }
    }

    fn back_or_home(&mut self) {
        match self.history.pop() {
            Some(route) => self.load(route),
            None => self.load(Route::Home),
        }
    }

    // Notifications

    pub fn show_success(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            kind: ToastKind::Success,
            shown_at: Instant::now(),
        });
    }

    pub fn show_error(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            kind: ToastKind::Error,
            shown_at: Instant::now(),
        });
    }

    pub fn expire_toast(&mut self, now: Instant) {
        if self
            .toast
            .as_ref()
            .is_some_and(|t| now.duration_since(t.shown_at) >= TOAST_DURATION)
        {
            self.toast = None;
        }
    }

    // Selection

    pub fn current_items(&self) -> Vec<&MenuItem> {
        match &self.content {
            Content::Home(rows) => rows
                .get(self.selected_row)
                .map(|r| r.items.iter().collect())
                .unwrap_or_default(),
            Content::Category(page) => page.displayed(),
            _ => Vec::new(),
        }
    }

    pub fn select_up(&mut self) {
        match self.mode {
            AppMode::Browse if matches!(self.content, Content::Home(_)) => {
                self.selected_row = self.selected_row.saturating_sub(1);
                self.selected = 0;
            }
            AppMode::SelectCategory => self.popup_selected = self.popup_selected.saturating_sub(1),
            _ => self.selected = self.selected.saturating_sub(1),
        }
    }

    pub fn select_down(&mut self) {
        match self.mode {
            AppMode::Browse => match &self.content {
                Content::Home(rows) => {
                    if self.selected_row + 1 < rows.len() {
                        self.selected_row += 1;
                        self.selected = 0;
                    }
                }
                _ => {
                    if self.selected + 1 < self.current_items().len() {
                        self.selected += 1;
                    }
                }
            },
            AppMode::Search => {
                if self.selected + 1 < self.search_results.len() {
                    self.selected += 1;
                }
            }
            AppMode::SelectCategory => {
                if self.popup_selected + 1 < catalog::categories().count() {
                    self.popup_selected += 1;
                }
            }
            _ => {}
        }
    }

    /// Left/right: carousel position on home, chip on a category page.
    pub fn select_side(&mut self, forward: bool) {
        match &mut self.content {
            Content::Home(rows) => {
                let len = rows.get(self.selected_row).map_or(0, |r| r.items.len());
                if forward && self.selected + 1 < len {
                    self.selected += 1;
                } else if !forward {
                    self.selected = self.selected.saturating_sub(1);
                }
            }
            Content::Category(page) => {
                let chips = page.chips();
                if chips.is_empty() {
                    return;
                }
                self.chip_index = if forward {
                    (self.chip_index + 1) % chips.len()
                } else {
                    (self.chip_index + chips.len() - 1) % chips.len()
                };
                page.select_chip(chips[self.chip_index]);
                self.selected = 0;
            }
            _ => {}
        }
    }

    pub fn open_selected(&mut self) {
        let target = match self.mode {
            AppMode::Search => self.search_results.get(self.selected).map(|i| i.id.clone()),
            _ => self.current_items().get(self.selected).map(|i| i.id.clone()),
        };
        if let Some(id) = target {
            self.mode = AppMode::Browse;
            self.navigate(Route::Item(id));
        }
    }

    pub fn toggle_theme(&mut self) {
        self.theme.toggle();
    }

    pub fn toggle_simple(&mut self) {
        self.simple = !self.simple;
    }

    // Category picker

    pub fn open_category_picker(&mut self) {
        self.popup_selected = match &self.route {
            Route::Category(name) => catalog::categories().position(|c| c == name.as_str()).unwrap_or(0),
            _ => 0,
        };
        self.mode = AppMode::SelectCategory;
    }

    pub fn popup_select(&mut self) {
        self.mode = AppMode::Browse;
        if let Some(category) = catalog::categories().nth(self.popup_selected) {
            self.navigate(Route::Category(category.to_string()));
        }
    }

    pub fn close_popup(&mut self) {
        self.mode = AppMode::Browse;
    }

    // Search

    pub fn open_search(&mut self) {
        self.mode = AppMode::Search;
        self.selected = 0;
    }

    pub fn close_search(&mut self) {
        self.mode = AppMode::Browse;
        self.selected = 0;
    }

    pub fn search_char(&mut self, c: char) {
        self.search_input.push(c);
        self.run_search();
    }

    pub fn search_backspace(&mut self) {
        self.search_input.pop();
        self.run_search();
    }

    pub fn cycle_search_mode(&mut self) {
        self.search_mode = self.search_mode.next();
        self.run_search();
    }

    fn run_search(&mut self) {
        self.search_generation += 1;
        self.selected = 0;
        if self.search_input.is_empty() {
            self.search_results.clear();
            return;
        }

        let generation = self.search_generation;
        let store = Arc::clone(&self.store);
        let tx = self.tx.clone();
        let term = self.search_input.clone();
        let mode = self.search_mode;
        tokio::spawn(async move {
            let result = search(&*store, &term, mode).await;
            let response = Response::Search(result.map_err(|e| e.to_string()));
            let _ = tx.send(Tagged { generation, response });
        });
    }

    // Admin

    pub fn open_login(&mut self) {
        self.login_input.clear();
        self.mode = AppMode::Login;
    }

    pub fn submit_login(&mut self) {
        let attempt = std::mem::take(&mut self.login_input);
        self.mode = AppMode::Browse;
        if self.session.login(&self.gate, &attempt) {
            self.show_success("Admin mode enabled");
        } else {
            self.show_error("Incorrect passcode");
        }
    }

    pub fn logout(&mut self) {
        if self.session.is_admin() {
            self.session.logout();
            self.show_success("Logged out");
        }
    }

    pub fn open_add_form(&mut self) {
        if !self.session.is_admin() {
            return;
        }
        let Route::Category(category) = &self.route else {
            self.show_error("Open a category to add items");
            return;
        };
        self.form = Some(FormState::create(category));
        self.mode = AppMode::Form;
    }

    pub fn open_edit_form(&mut self) {
        if !self.session.is_admin() {
            return;
        }
        if let Content::Item(item) = &self.content {
            self.form = Some(FormState::edit(item));
            self.mode = AppMode::Form;
        }
    }

    pub fn cancel_form(&mut self) {
        self.form = None;
        self.mode = AppMode::Browse;
    }

    pub fn submit_form(&mut self) {
        let Some(admin) = self.session.admin().cloned() else {
            self.show_error("Admin mode required");
            return;
        };
        let Some(form) = &mut self.form else {
            return;
        };
        if form.saving {
            return;
        }
        form.apply_image();
        if let Err(e) = form.draft.validate() {
            form.error = Some(e.to_string());
            return;
        }
        form.error = None;
        form.saving = true;

        let draft = form.draft.clone();
        let mode = form.mode.clone();
        let store = Arc::clone(&self.store);
        let uploader = Arc::clone(&self.uploader);
        let tx = self.tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let result = menubible_core::submit(&admin, &draft, &mode, &*store, &*uploader).await;
            let response = Response::Saved(result.map_err(|e| e.to_string()));
            let _ = tx.send(Tagged { generation, response });
        });
    }

    pub fn request_delete(&mut self) {
        if self.session.is_admin() && matches!(self.content, Content::Item(_)) {
            self.mode = AppMode::ConfirmDelete;
        }
    }

    pub fn confirm_delete(&mut self) {
        let (Some(admin), Content::Item(item)) = (self.session.admin().cloned(), &self.content) else {
            self.mode = AppMode::Browse;
            return;
        };
        let id = item.id.clone();
        let store = Arc::clone(&self.store);
        let tx = self.tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let result = menubible_core::delete(&admin, &*store, &id).await;
            let response = Response::Deleted(result.map(|_| id).map_err(|e| e.to_string()));
            let _ = tx.send(Tagged { generation, response });
        });
    }

    pub fn palette(&self) -> &'static menubible_core::Palette {
        self.theme.active(&self.route)
    }
}
