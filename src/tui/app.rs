// src/tui/app.rs

use clap::ValueEnum;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::ListState;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn, Level};

use crate::config::{Config, KeyBindingsConfig};
use crate::domain::{
    parse_filter_expression, seed, AuditLogEntry, Dataset, Incident, OperatorAccount, Tourist, Zone,
};
use crate::locale::{LocaleChanged, LocaleStore, SubscriptionId};
use crate::services::{
    bulk_action, digital_id, efir, AlertKind, AlertPriority, BulkActionKind, BulkActionReceipt,
    BulkActionRequest, DigitalId, Efir, EfirPriority, EfirTemplate, IdentityRequest,
};
use crate::task::{TaskHandle, TaskProgress, TaskState};

use super::table_source::{RegistryTable, TableSource};
use super::theme::AppTheme;

/// Tabs of the TUI, in tab order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppView {
    Registry(Dataset),
    Logs,
}

impl AppView {
    pub fn next(&self) -> Self {
        match self {
            Self::Registry(Dataset::Tourists) => Self::Registry(Dataset::Zones),
            Self::Registry(Dataset::Zones) => Self::Registry(Dataset::Incidents),
            Self::Registry(Dataset::Incidents) => Self::Registry(Dataset::AuditLogs),
            Self::Registry(Dataset::AuditLogs) => Self::Registry(Dataset::Users),
            Self::Registry(Dataset::Users) => Self::Logs,
            Self::Logs => Self::Registry(Dataset::Tourists),
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Self::Registry(Dataset::Tourists) => Self::Logs,
            Self::Registry(Dataset::Zones) => Self::Registry(Dataset::Tourists),
            Self::Registry(Dataset::Incidents) => Self::Registry(Dataset::Zones),
            Self::Registry(Dataset::AuditLogs) => Self::Registry(Dataset::Incidents),
            Self::Registry(Dataset::Users) => Self::Registry(Dataset::AuditLogs),
            Self::Logs => Self::Registry(Dataset::Users),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Registry(dataset) => dataset.title(),
            Self::Logs => "Logs",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Searching,
    Filtering,
    ComposingBulk,
}

#[derive(Clone, Debug)]
pub struct UILogEntry {
    pub timestamp: String, // formatted in the tracing layer
    pub level: Level,
    pub target: String,
    pub message: String,
}

/// The bulk action being composed in the popup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BulkDraft {
    pub kind: BulkActionKind,
    pub alert_type: AlertKind,
    pub priority: AlertPriority,
}

/// The one background task the UI tracks at a time.
pub enum ActiveTask {
    DigitalId { tourist_id: u32, handle: TaskHandle<DigitalId> },
    Efir(TaskHandle<Efir>),
    Bulk(TaskHandle<BulkActionReceipt>),
}

impl ActiveTask {
    pub fn name(&self) -> &str {
        match self {
            ActiveTask::DigitalId { handle, .. } => handle.name(),
            ActiveTask::Efir(handle) => handle.name(),
            ActiveTask::Bulk(handle) => handle.name(),
        }
    }

    pub fn progress(&self) -> Option<TaskProgress> {
        match self {
            ActiveTask::DigitalId { handle, .. } => handle.state().progress().cloned(),
            ActiveTask::Efir(handle) => handle.state().progress().cloned(),
            ActiveTask::Bulk(handle) => handle.state().progress().cloned(),
        }
    }

    pub fn is_finished(&self) -> bool {
        match self {
            ActiveTask::DigitalId { handle, .. } => handle.is_finished(),
            ActiveTask::Efir(handle) => handle.is_finished(),
            ActiveTask::Bulk(handle) => handle.is_finished(),
        }
    }

    pub fn cancel(&self) {
        match self {
            ActiveTask::DigitalId { handle, .. } => handle.cancel(),
            ActiveTask::Efir(handle) => handle.cancel(),
            ActiveTask::Bulk(handle) => handle.cancel(),
        }
    }
}

pub struct App {
    pub should_quit: bool,
    pub config: Arc<Config>,
    pub theme: Arc<AppTheme>,
    pub active_view: AppView,
    pub input_mode: InputMode,
    pub current_input: String,
    pub show_keybindings_modal: bool,
    pub status_message: Option<String>,

    pub tourists: RegistryTable<Tourist>,
    pub zones: RegistryTable<Zone>,
    pub incidents: RegistryTable<Incident>,
    pub audit_logs: RegistryTable<AuditLogEntry>,
    pub users: RegistryTable<OperatorAccount>,

    pub locale: LocaleStore,
    pub locale_subscription: SubscriptionId,
    pub locale_receiver: Option<mpsc::UnboundedReceiver<LocaleChanged>>,

    pub active_task: Option<ActiveTask>,
    pub bulk_draft: Option<BulkDraft>,

    pub log_entries: Vec<UILogEntry>,
    pub log_list_state: ListState,
    pub log_receiver: Option<mpsc::UnboundedReceiver<UILogEntry>>,

    pub keybinding_map: HashMap<String, (KeyCode, KeyModifiers)>,
}

impl App {
    pub fn new(config: Arc<Config>, log_receiver: mpsc::UnboundedReceiver<UILogEntry>) -> Self {
        let now = chrono::Utc::now();
        let listing = &config.listing;
        let mut locale = LocaleStore::new(&config.locale.default_language);
        let subscription = locale.subscribe();

        let app = Self {
            should_quit: false,
            theme: Arc::new(AppTheme::default()),
            active_view: AppView::Registry(config.default_dataset()),
            input_mode: InputMode::Normal,
            current_input: String::new(),
            show_keybindings_modal: false,
            status_message: None,
            tourists: RegistryTable::new(
                Dataset::Tourists,
                seed::tourists(now),
                listing.page_size_for(Dataset::Tourists),
            ),
            zones: RegistryTable::new(Dataset::Zones, seed::zones(), listing.page_size_for(Dataset::Zones)),
            incidents: RegistryTable::new(
                Dataset::Incidents,
                seed::incidents(),
                listing.page_size_for(Dataset::Incidents),
            ),
            audit_logs: RegistryTable::new(
                Dataset::AuditLogs,
                seed::audit_logs(),
                listing.page_size_for(Dataset::AuditLogs),
            ),
            users: RegistryTable::new(
                Dataset::Users,
                seed::operator_accounts(),
                listing.page_size_for(Dataset::Users),
            ),
            locale,
            locale_subscription: subscription.id,
            locale_receiver: Some(subscription.receiver),
            active_task: None,
            bulk_draft: None,
            log_entries: Vec::new(),
            log_list_state: ListState::default(),
            log_receiver: Some(log_receiver),
            keybinding_map: parse_keybindings(&config.keybindings),
            config,
        };
        info!(
            "Loaded {} tourists, {} zones, {} incidents, {} audit entries, {} operators",
            app.tourists.list.source_len(),
            app.zones.list.source_len(),
            app.incidents.list.source_len(),
            app.audit_logs.list.source_len(),
            app.users.list.source_len()
        );
        app
    }

    pub fn table(&self, dataset: Dataset) -> &dyn TableSource {
        match dataset {
            Dataset::Tourists => &self.tourists,
            Dataset::Zones => &self.zones,
            Dataset::Incidents => &self.incidents,
            Dataset::AuditLogs => &self.audit_logs,
            Dataset::Users => &self.users,
        }
    }

    pub fn table_mut(&mut self, dataset: Dataset) -> &mut dyn TableSource {
        match dataset {
            Dataset::Tourists => &mut self.tourists,
            Dataset::Zones => &mut self.zones,
            Dataset::Incidents => &mut self.incidents,
            Dataset::AuditLogs => &mut self.audit_logs,
            Dataset::Users => &mut self.users,
        }
    }

    /// The table behind the active tab, if the tab shows a registry.
    pub fn active_table(&self) -> Option<&dyn TableSource> {
        match self.active_view {
            AppView::Registry(dataset) => Some(self.table(dataset)),
            AppView::Logs => None,
        }
    }

    pub fn active_table_mut(&mut self) -> Option<&mut dyn TableSource> {
        match self.active_view {
            AppView::Registry(dataset) => Some(self.table_mut(dataset)),
            AppView::Logs => None,
        }
    }

    pub fn key_matches(&self, action: &str, key_event: &KeyEvent) -> bool {
        match self.keybinding_map.get(action) {
            Some((code, mods)) => {
                // Terminals report Shift alongside upper-case chars; the char already carries it.
                let mut pressed = key_event.modifiers;
                if matches!(key_event.code, KeyCode::Char(_) | KeyCode::BackTab) {
                    pressed.remove(KeyModifiers::SHIFT);
                }
                key_event.code == *code && pressed == *mods
            }
            None => false,
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn next_view(&mut self) {
        self.active_view = self.active_view.next();
    }

    pub fn previous_view(&mut self) {
        self.active_view = self.active_view.previous();
    }

    pub fn start_search(&mut self) {
        let Some(table) = self.active_table() else {
            return;
        };
        self.current_input = table.search().to_string();
        self.input_mode = InputMode::Searching;
    }

    /// Applies the search bar text to the active table as it is typed.
    pub fn apply_search_input(&mut self) {
        let input = self.current_input.clone();
        if let Some(table) = self.active_table_mut() {
            table.set_search(&input);
        }
    }

    pub fn clear_search(&mut self) {
        self.current_input.clear();
        self.apply_search_input();
        self.input_mode = InputMode::Normal;
    }

    pub fn start_filter(&mut self) {
        if self.active_table().is_none() {
            return;
        }
        self.current_input.clear();
        self.input_mode = InputMode::Filtering;
    }

    /// Applies the prompt as one criterion on the active table. `field=`
    /// with no value drops that field's criterion. A rejected expression
    /// keeps the prompt open.
    pub fn submit_filter(&mut self) {
        let input = self.current_input.trim().to_string();
        let Some(table) = self.active_table_mut() else {
            return;
        };
        let dataset = table.dataset();
        let outcome = match input.strip_suffix('=').map(str::trim) {
            Some(field) if !field.contains(|c: char| matches!(c, '<' | '>' | '~' | '=')) => dataset
                .filterable_field(field)
                .map(|_| {
                    table.remove_criterion(field);
                    format!("Filter on {} removed", field)
                }),
            _ => parse_filter_expression(dataset, &input).map(|(field, criterion)| {
                table.set_criterion(&field, criterion);
                format!("Filter: {}", table.criteria())
            }),
        };
        match outcome {
            Ok(message) => {
                info!("{} on {}", message, dataset);
                self.current_input.clear();
                self.input_mode = InputMode::Normal;
                self.set_status(message);
            }
            Err(e) => self.set_status(e.to_string()),
        }
    }

    pub fn cancel_filter(&mut self) {
        self.current_input.clear();
        self.input_mode = InputMode::Normal;
    }

    pub fn clear_filters(&mut self) {
        let Some(table) = self.active_table_mut() else {
            return;
        };
        if table.criteria().is_empty() {
            return;
        }
        table.clear_criteria();
        self.set_status("Filters cleared");
    }

    /// Digit keys sort by the n-th column, header-click style.
    pub fn sort_by_column(&mut self, index: usize) {
        let Some(table) = self.active_table_mut() else {
            return;
        };
        if !table.sort_by_column(index) {
            let label = table.columns().get(index).map(|f| f.label);
            match label {
                Some(label) => self.set_status(format!("'{}' is not sortable", label)),
                None => self.set_status(format!("No column {}", index + 1)),
            }
        }
    }

    /// Grows or shrinks the active page by `delta` rows, never below one.
    pub fn resize_page(&mut self, delta: isize) {
        let Some(table) = self.active_table_mut() else {
            return;
        };
        let current = table.page().page_size as isize;
        let size = (current + delta).max(1) as usize;
        table.set_page_size(size);
        self.set_status(format!("{} rows per page", size));
    }

    fn task_running(&mut self) -> bool {
        let running = self.active_task.as_ref().is_some_and(|t| !t.is_finished());
        if running {
            self.set_status("Another task is still running");
        }
        running
    }

    /// Issues a digital ID for the tourist under the cursor.
    pub fn issue_digital_id(&mut self) {
        if self.active_view != AppView::Registry(Dataset::Tourists) || self.task_running() {
            return;
        }
        let Some(tourist) = self.tourists.cursor_record() else {
            return;
        };
        let tourist_id = tourist.id;
        let request = IdentityRequest::from(tourist);
        info!("Issuing digital ID for {}", request.name);
        let handle = digital_id::spawn_issuance(request, self.config.tasks.step_delay());
        self.active_task = Some(ActiveTask::DigitalId { tourist_id, handle });
    }

    /// Files an E-FIR for the incident under the cursor.
    pub fn generate_efir(&mut self) {
        if self.active_view != AppView::Registry(Dataset::Incidents) || self.task_running() {
            return;
        }
        let Some(incident) = self.incidents.cursor_record() else {
            return;
        };
        let template = EfirTemplate::for_incident(incident.kind);
        let priority = EfirPriority::from(incident.severity);
        let incident_id = incident.id.clone();
        info!(
            "Generating E-FIR for {} ({}) using {}",
            incident_id,
            incident.kind.label(),
            template.label()
        );
        let handle = efir::spawn_generation(
            self.incidents.list.source().to_vec(),
            incident_id,
            template,
            priority,
            self.config.tasks.step_delay(),
        );
        self.active_task = Some(ActiveTask::Efir(handle));
    }

    /// Opens the compose popup for a bulk action on the selected tourists.
    pub fn begin_bulk(&mut self, kind: BulkActionKind) {
        if self.active_view != AppView::Registry(Dataset::Tourists) {
            self.set_status("Bulk actions work on the Tourists tab");
            return;
        }
        if self.tourists.list.selection().is_empty() {
            self.set_status("Select at least one tourist first");
            return;
        }
        self.bulk_draft = Some(BulkDraft {
            kind,
            alert_type: AlertKind::default(),
            priority: AlertPriority::default(),
        });
        self.current_input.clear();
        self.input_mode = InputMode::ComposingBulk;
    }

    pub fn cycle_bulk_alert_type(&mut self) {
        if let Some(draft) = self.bulk_draft.as_mut() {
            draft.alert_type = cycle_variant(draft.alert_type);
        }
    }

    pub fn cycle_bulk_priority(&mut self) {
        if let Some(draft) = self.bulk_draft.as_mut() {
            draft.priority = cycle_variant(draft.priority);
        }
    }

    pub fn cancel_bulk(&mut self) {
        self.bulk_draft = None;
        self.current_input.clear();
        self.input_mode = InputMode::Normal;
    }

    /// Validates the draft and starts dispatch. Invalid drafts keep the popup open.
    pub fn submit_bulk(&mut self) {
        let Some(draft) = self.bulk_draft else {
            return;
        };
        if self.task_running() {
            return;
        }
        let request = BulkActionRequest {
            alert_type: draft.alert_type,
            priority: draft.priority,
            ..BulkActionRequest::new(draft.kind, self.tourists.list.selected_ids(), self.current_input.clone())
        };
        match bulk_action::spawn_dispatch(
            request,
            self.tourists.list.source().to_vec(),
            self.config.tasks.step_delay(),
        ) {
            Ok(handle) => {
                self.active_task = Some(ActiveTask::Bulk(handle));
                self.cancel_bulk();
            }
            Err(e) => {
                warn!("Bulk action rejected: {}", e);
                self.set_status(e.to_string());
            }
        }
    }

    pub fn cancel_task(&mut self) {
        match &self.active_task {
            Some(task) if !task.is_finished() => task.cancel(),
            _ => self.set_status("No task is running"),
        }
    }

    /// Picks up a finished task and applies its outcome.
    pub fn poll_task(&mut self) {
        if !self.active_task.as_ref().is_some_and(ActiveTask::is_finished) {
            return;
        }
        let Some(task) = self.active_task.take() else {
            return;
        };
        let name = task.name().to_string();
        let message = match task {
            ActiveTask::DigitalId { tourist_id, handle } => match handle.state() {
                TaskState::Succeeded(issued) => self.apply_digital_id(tourist_id, issued),
                other => describe_unsuccessful(&name, other),
            },
            ActiveTask::Efir(handle) => match handle.state() {
                TaskState::Succeeded(report) => format!(
                    "E-FIR {} filed for {} ({})",
                    report.efir_number,
                    report.incident_id,
                    report.template.label()
                ),
                other => describe_unsuccessful(&name, other),
            },
            ActiveTask::Bulk(handle) => match handle.state() {
                TaskState::Succeeded(receipt) => {
                    self.tourists.list.clear_selection();
                    format!(
                        "{}: delivered to {} of {} tourists",
                        receipt.kind.title(),
                        receipt.delivered,
                        receipt.recipients.len()
                    )
                }
                other => describe_unsuccessful(&name, other),
            },
        };
        info!("{}", message);
        self.set_status(message);
    }

    fn apply_digital_id(&mut self, tourist_id: u32, issued: DigitalId) -> String {
        match self.tourists.list.get(&tourist_id).cloned() {
            Some(mut tourist) => {
                tourist.digital_id = issued.digital_id.clone();
                tourist.blockchain_hash = issued.blockchain_hash;
                let message = format!("Digital ID {} issued for {}", issued.digital_id, tourist.name);
                self.tourists.list.upsert(tourist);
                message
            }
            None => format!("Digital ID {} issued, but tourist {} is gone", issued.digital_id, tourist_id),
        }
    }

    pub fn cycle_language(&mut self) {
        self.locale.cycle_next();
    }

    pub fn on_locale_changed(&mut self, change: LocaleChanged) {
        self.set_status(format!(
            "Language: {} ({})",
            change.current.native_name, change.current.name
        ));
    }

    /// Drops the locale subscription. Called once the event loop exits.
    pub fn teardown(&mut self) {
        self.locale.unsubscribe(self.locale_subscription);
        if let Some(task) = &self.active_task {
            task.cancel();
        }
    }

    pub fn scroll_logs(&mut self, delta: isize) {
        if self.log_entries.is_empty() {
            return;
        }
        let last = self.log_entries.len() - 1;
        let current = self.log_list_state.selected().unwrap_or(last) as isize;
        let next = (current + delta).clamp(0, last as isize) as usize;
        self.log_list_state.select(Some(next));
    }
}

fn describe_unsuccessful<T>(name: &str, state: TaskState<T>) -> String {
    let label = state.status_label();
    match state {
        TaskState::Failed(reason) => {
            warn!("Task '{}' failed: {}", name, reason);
            format!("{} {}: {}", name, label, reason)
        }
        _ => format!("{} {}", name, label),
    }
}

fn cycle_variant<E: ValueEnum + PartialEq + Copy>(current: E) -> E {
    let variants = E::value_variants();
    let index = variants.iter().position(|v| *v == current).unwrap_or(0);
    variants[(index + 1) % variants.len()]
}

fn parse_keybindings(cfg: &KeyBindingsConfig) -> HashMap<String, (KeyCode, KeyModifiers)> {
    let mut map = HashMap::new();
    macro_rules! insert {
        ($action:expr, $binding:expr) => {
            match parse_keybinding(&$binding) {
                Some(parsed) => {
                    map.insert($action.to_string(), parsed);
                }
                None => warn!("Ignoring unparseable keybinding '{}' for {}", $binding, $action),
            }
        };
    }
    insert!("quit", cfg.quit);
    insert!("help", cfg.help);
    insert!("next_tab", cfg.next_tab);
    insert!("prev_tab", cfg.prev_tab);
    insert!("up", cfg.up);
    insert!("down", cfg.down);
    insert!("search", cfg.search);
    insert!("filter", cfg.filter);
    insert!("clear_filters", cfg.clear_filters);
    insert!("next_page", cfg.next_page);
    insert!("prev_page", cfg.prev_page);
    insert!("toggle_select", cfg.toggle_select);
    insert!("select_page", cfg.select_page);
    insert!("clear_selection", cfg.clear_selection);
    insert!("bulk_message", cfg.bulk_message);
    insert!("bulk_alert", cfg.bulk_alert);
    insert!("bulk_emergency", cfg.bulk_emergency);
    insert!("issue_id", cfg.issue_id);
    insert!("generate_efir", cfg.generate_efir);
    insert!("cancel_task", cfg.cancel_task);
    insert!("cycle_language", cfg.cycle_language);
    map
}

/// Parses "Ctrl+x", "Alt+Left", "Space", "A" and friends. Single characters
/// keep their case so "a" and "A" can be bound separately.
pub fn parse_keybinding(s: &str) -> Option<(KeyCode, KeyModifiers)> {
    let s = s.trim();
    let mut mods = KeyModifiers::empty();
    let mut key = s;
    if let Some(stripped) = key.strip_prefix("Ctrl+") {
        mods |= KeyModifiers::CONTROL;
        key = stripped;
    }
    if let Some(stripped) = key.strip_prefix("Alt+") {
        mods |= KeyModifiers::ALT;
        key = stripped;
    }
    let mut chars = key.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some((KeyCode::Char(c), mods));
    }
    let code = match key.to_lowercase().as_str() {
        "tab" => KeyCode::Tab,
        "backtab" => KeyCode::BackTab,
        "enter" => KeyCode::Enter,
        "esc" => KeyCode::Esc,
        "space" => KeyCode::Char(' '),
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        _ => return None,
    };
    Some((code, mods))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn app_with(config: Config) -> App {
        let (_tx, rx) = mpsc::unbounded_channel();
        App::new(Arc::new(config), rx)
    }

    fn quick_config() -> Config {
        let mut config = Config::default();
        config.tasks.step_delay_ms = 1;
        config
    }

    async fn settle(app: &mut App) {
        for _ in 0..200 {
            app.poll_task();
            if app.active_task.is_none() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("task did not finish");
    }

    #[test]
    fn keybindings_keep_character_case() {
        assert_eq!(parse_keybinding("A"), Some((KeyCode::Char('A'), KeyModifiers::NONE)));
        assert_eq!(parse_keybinding("a"), Some((KeyCode::Char('a'), KeyModifiers::NONE)));
        assert_eq!(parse_keybinding("Space"), Some((KeyCode::Char(' '), KeyModifiers::NONE)));
        assert_eq!(parse_keybinding("Ctrl+c"), Some((KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert_eq!(parse_keybinding("BackTab"), Some((KeyCode::BackTab, KeyModifiers::NONE)));
        assert_eq!(parse_keybinding("Hyper"), None);
    }

    #[test]
    fn shifted_chars_match_their_binding() {
        let app = app_with(Config::default());
        let shifted = KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert!(app.key_matches("bulk_alert", &shifted));
        assert!(!app.key_matches("select_page", &shifted));
    }

    #[test]
    fn tabs_cycle_through_every_view() {
        let mut view = AppView::Registry(Dataset::Tourists);
        for _ in 0..6 {
            assert_eq!(view.next().previous(), view);
            view = view.next();
        }
        assert_eq!(view, AppView::Registry(Dataset::Tourists));
    }

    #[test]
    fn default_view_comes_from_config() {
        let mut config = Config::default();
        config.interface.default_view = "incidents".to_string();
        let app = app_with(config);
        assert_eq!(app.active_view, AppView::Registry(Dataset::Incidents));
    }

    #[test]
    fn search_input_filters_the_active_table() {
        let mut app = app_with(Config::default());
        app.start_search();
        app.current_input = "lotus".to_string();
        app.apply_search_input();
        assert_eq!(app.tourists.page().total_filtered, 1);
        app.clear_search();
        assert_eq!(app.tourists.page().total_filtered, app.tourists.list.source_len());
    }

    #[test]
    fn bulk_compose_requires_a_selection() {
        let mut app = app_with(Config::default());
        app.begin_bulk(BulkActionKind::Message);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.status_message.is_some());

        app.tourists.select_page();
        app.begin_bulk(BulkActionKind::Alert);
        assert_eq!(app.input_mode, InputMode::ComposingBulk);
        app.cycle_bulk_alert_type();
        assert_eq!(app.bulk_draft.map(|d| d.alert_type), Some(AlertKind::Safety));
    }

    #[tokio::test]
    async fn blank_bulk_message_keeps_the_popup_open() {
        let mut app = app_with(quick_config());
        app.tourists.select_page();
        app.begin_bulk(BulkActionKind::Message);
        app.current_input = "   ".to_string();
        app.submit_bulk();
        assert_eq!(app.input_mode, InputMode::ComposingBulk);
        assert!(app.active_task.is_none());
    }

    #[tokio::test]
    async fn bulk_dispatch_clears_the_selection_when_done() {
        let mut app = app_with(quick_config());
        app.tourists.select_page();
        let selected = app.tourists.selected_count();
        app.begin_bulk(BulkActionKind::Message);
        app.current_input = "Stay hydrated".to_string();
        app.submit_bulk();
        assert_eq!(app.input_mode, InputMode::Normal);
        settle(&mut app).await;
        assert_eq!(app.tourists.selected_count(), 0);
        let status = app.status_message.clone().unwrap_or_default();
        assert!(status.contains(&format!("{} of {}", selected, selected)), "{}", status);
    }

    #[tokio::test]
    async fn issued_digital_id_is_written_back_to_the_tourist() {
        let mut app = app_with(quick_config());
        let before = app.tourists.cursor_record().cloned().unwrap();
        app.issue_digital_id();
        settle(&mut app).await;
        let after = app.tourists.list.get(&before.id).unwrap();
        assert_ne!(after.digital_id, before.digital_id);
        assert!(after.blockchain_hash.starts_with("0x"));
    }

    #[tokio::test]
    async fn efir_only_runs_from_the_incidents_tab() {
        let mut app = app_with(quick_config());
        app.generate_efir();
        assert!(app.active_task.is_none());
        app.active_view = AppView::Registry(Dataset::Incidents);
        app.generate_efir();
        assert!(app.active_task.is_some());
        settle(&mut app).await;
        assert!(app.status_message.unwrap_or_default().starts_with("E-FIR EFIR-"));
    }

    #[tokio::test]
    async fn cancelled_tasks_report_cancellation() {
        let mut config = Config::default();
        config.tasks.step_delay_ms = 10_000;
        let mut app = app_with(config);
        app.issue_digital_id();
        app.cancel_task();
        settle(&mut app).await;
        assert!(app.status_message.unwrap_or_default().ends_with("cancelled"));
    }

    #[tokio::test]
    async fn language_changes_reach_the_subscription() {
        let mut app = app_with(Config::default());
        let mut rx = app.locale_receiver.take().unwrap();
        app.cycle_language();
        let change = rx.recv().await.unwrap();
        assert_eq!(change.current.code, "hi");
        app.on_locale_changed(change);
        assert!(app.status_message.unwrap_or_default().contains("Hindi"));
    }

    #[test]
    fn teardown_unsubscribes_from_the_locale_store() {
        let mut app = app_with(Config::default());
        assert_eq!(app.locale.subscriber_count(), 1);
        app.teardown();
        assert_eq!(app.locale.subscriber_count(), 0);
    }
}
