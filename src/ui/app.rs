use std::path::PathBuf;
use std::time::Duration;

use smeta::files;
use smeta::ledger::{ImportReport, Ledger};
use smeta::models::REGIONS;
use smeta::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Planning,
    Manage,
    Files,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Planning, Self::Manage, Self::Files]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Planning => write!(f, "Planning"),
            Self::Manage => write!(f, "Manage"),
            Self::Files => write!(f, "Files"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Search,
    Editing,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Search => write!(f, "SEARCH"),
            Self::Editing => write!(f, "EDIT"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Which list the cursor keys move on screens with two lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pane {
    Regions,
    Items,
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone)]
pub(crate) enum PendingAction {
    DeleteItem { region: String, index: usize },
    DeleteRegion { region: String },
    ClearAll,
    Import { path: PathBuf },
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) search_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,

    // Settings
    pub(crate) currency: String,
    pub(crate) io_timeout: Duration,
    pub(crate) export_dir: PathBuf,

    /// Region the item commands act on.
    pub(crate) region: Option<String>,
    pub(crate) pane: Pane,

    // Planning: region picker over the catalogue
    pub(crate) picker_index: usize,
    pub(crate) picker_scroll: usize,

    // Manage: regions that have a record
    pub(crate) record_index: usize,
    pub(crate) record_scroll: usize,

    // Items of the active region
    pub(crate) item_index: usize,
    pub(crate) item_scroll: usize,

    // Files
    pub(crate) file_browser_path: PathBuf,
    pub(crate) file_browser_entries: Vec<PathBuf>,
    pub(crate) file_browser_index: usize,
    pub(crate) file_browser_scroll: usize,
    pub(crate) file_browser_filter: String,
    pub(crate) file_browser_show_hidden: bool,
    pub(crate) file_browser_input_focused: bool,
    pub(crate) last_report: Option<ImportReport>,
    pub(crate) last_export: Vec<PathBuf>,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(settings: &Settings) -> Self {
        let export_dir = settings.export_dir();
        Self {
            running: true,
            screen: Screen::Planning,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            search_input: String::new(),
            status_message: String::new(),
            show_help: false,

            currency: settings.currency.clone(),
            io_timeout: settings.io_timeout(),
            file_browser_path: export_dir.clone(),
            export_dir,

            region: REGIONS.first().map(|r| r.to_string()),
            pane: Pane::Regions,

            picker_index: 0,
            picker_scroll: 0,

            record_index: 0,
            record_scroll: 0,

            item_index: 0,
            item_scroll: 0,

            file_browser_entries: Vec::new(),
            file_browser_index: 0,
            file_browser_scroll: 0,
            file_browser_filter: String::new(),
            file_browser_show_hidden: false,
            file_browser_input_focused: false,
            last_report: None,
            last_export: Vec::new(),

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        }
    }

    /// Catalogue regions matching the search, as indices into `REGIONS`.
    pub(crate) fn filtered_regions(&self) -> Vec<usize> {
        let filter = self.search_input.trim().to_lowercase();
        REGIONS
            .iter()
            .enumerate()
            .filter(|(_, r)| filter.is_empty() || r.to_lowercase().contains(&filter))
            .map(|(i, _)| i)
            .collect()
    }

    /// Region under the Planning picker cursor.
    pub(crate) fn picker_region(&self) -> Option<&'static str> {
        self.filtered_regions()
            .get(self.picker_index)
            .and_then(|&i| REGIONS.get(i))
            .copied()
    }

    pub(crate) fn select_region(&mut self, region: impl Into<String>) {
        let region = region.into();
        if self.region.as_deref() != Some(region.as_str()) {
            self.item_index = 0;
            self.item_scroll = 0;
        }
        self.region = Some(region);
    }

    /// On Manage the active region follows the records cursor.
    pub(crate) fn sync_record_selection(&mut self, ledger: &Ledger) {
        if self.record_index >= ledger.len() {
            self.record_index = ledger.len().saturating_sub(1);
        }
        if let Some(region) = ledger.regions().nth(self.record_index) {
            let region = region.to_string();
            self.select_region(region);
        }
    }

    /// Keep cursors inside their lists after the ledger changed.
    pub(crate) fn clamp_cursors(&mut self, ledger: &Ledger) {
        let items = self.active_item_count(ledger);
        if self.item_index >= items {
            self.item_index = items.saturating_sub(1);
        }
        if self.item_scroll > self.item_index {
            self.item_scroll = self.item_index;
        }
        if self.record_index >= ledger.len() {
            self.record_index = ledger.len().saturating_sub(1);
        }
        if self.record_scroll > self.record_index {
            self.record_scroll = self.record_index;
        }
    }

    pub(crate) fn active_item_count(&self, ledger: &Ledger) -> usize {
        self.region
            .as_deref()
            .and_then(|r| ledger.record(r))
            .map_or(0, |rec| rec.items().len())
    }

    pub(crate) fn refresh_file_browser(&mut self) {
        let mut entries: Vec<PathBuf> = Vec::new();

        if let Some(parent) = self.file_browser_path.parent() {
            entries.push(parent.to_path_buf());
        }

        if let Ok(read_dir) = std::fs::read_dir(&self.file_browser_path) {
            let is_hidden = |p: &PathBuf| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with('.'))
            };

            let all: Vec<PathBuf> = read_dir
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| {
                    (self.file_browser_show_hidden || !is_hidden(p))
                        && (p.is_dir() || files::is_importable(p))
                })
                .collect();

            let mut dirs: Vec<PathBuf> = all.iter().filter(|p| p.is_dir()).cloned().collect();
            let mut found: Vec<PathBuf> = all.iter().filter(|p| !p.is_dir()).cloned().collect();
            dirs.sort();
            found.sort();
            entries.extend(dirs);
            entries.extend(found);
        }

        self.file_browser_entries = entries;
        self.file_browser_index = 0;
        self.file_browser_scroll = 0;
        self.file_browser_filter.clear();
        self.file_browser_input_focused = false;
    }

    /// Returns filtered file browser entries (indices into `file_browser_entries`).
    /// When filter is empty, returns all. The `..` entry always passes.
    pub(crate) fn file_browser_filtered(&self) -> Vec<usize> {
        if self.file_browser_filter.is_empty() {
            return (0..self.file_browser_entries.len()).collect();
        }
        let filter = self.file_browser_filter.to_lowercase();
        self.file_browser_entries
            .iter()
            .enumerate()
            .filter(|(_, path)| {
                if Some(path.as_path()) == self.file_browser_path.parent() {
                    return true;
                }
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|name| name.to_lowercase().contains(&filter))
            })
            .map(|(i, _)| i)
            .collect()
    }

    pub(crate) fn selected_file(&self) -> Option<&PathBuf> {
        self.file_browser_filtered()
            .get(self.file_browser_index)
            .and_then(|&i| self.file_browser_entries.get(i))
    }

    /// Ask before running `action`.
    pub(crate) fn confirm(&mut self, message: impl Into<String>, action: PendingAction) {
        self.confirm_message = message.into();
        self.pending_action = Some(action);
        self.input_mode = InputMode::Confirm;
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    /// Rows available to list widgets, minus borders and table header.
    pub(crate) fn page(&self) -> usize {
        self.visible_rows.saturating_sub(3).max(1)
    }
}
