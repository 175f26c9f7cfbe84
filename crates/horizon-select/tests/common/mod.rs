//! Shared fixtures for the behavioral suites.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use horizon_select::prelude::*;
use parking_lot::{Mutex, MutexGuard};

pub const FIREFOX_LINUX: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";
pub const SAFARI_MAC: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 \
     (KHTML, like Gecko) Version/17.4 Safari/605.1.15";
pub const CHROME_WINDOWS: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";
pub const IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_5 like Mac OS X) \
     AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Mobile/15E148 Safari/604.1";
pub const ANDROID_CHROME: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/126.0.0.0 Mobile Safari/537.36";

/// Install a test subscriber once; `RUST_LOG` controls verbosity.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn env(user_agent: &str) -> Environment {
    Environment::from_user_agent(user_agent)
}

/// Everything the select did to its host.
#[derive(Debug, Default)]
pub struct HostLog {
    pub open: Vec<bool>,
    pub focus_indication: Vec<bool>,
    pub focused: Option<FocusTarget>,
    pub focus_requests: Vec<FocusTarget>,
    pub anchors: Vec<DropdownSettings>,
    pub anchor_clears: usize,
}

/// Recording fake for every host collaborator.
#[derive(Clone, Default)]
pub struct Host(Arc<Mutex<HostLog>>);

impl Host {
    pub fn log(&self) -> MutexGuard<'_, HostLog> {
        self.0.lock()
    }

    /// Platform focus left the widget.
    pub fn drop_focus(&self) {
        self.0.lock().focused = None;
    }
}

impl SelectUi for Host {
    fn set_open(&mut self, open: bool) {
        self.0.lock().open.push(open);
    }

    fn set_focus(&mut self, focused: bool) {
        self.0.lock().focus_indication.push(focused);
    }
}

impl FocusHost for Host {
    fn focused(&self) -> Option<FocusTarget> {
        self.0.lock().focused
    }

    fn focus(&mut self, target: FocusTarget) {
        let mut log = self.0.lock();
        log.focused = Some(target);
        log.focus_requests.push(target);
    }
}

impl DropdownCoordinator for Host {
    fn set_anchor(&mut self, settings: &DropdownSettings) {
        self.0.lock().anchors.push(settings.clone());
    }

    fn clear_anchor(&mut self) {
        self.0.lock().anchor_clears += 1;
    }
}

/// A mounted select with a synthetic clock.
pub struct Harness {
    pub select: Select,
    pub list: SourceList,
    pub host: Host,
    pub start: Instant,
}

impl Harness {
    pub fn new(list: SourceList, env: Environment) -> Self {
        Self::with_config(list, env, SelectConfig::default())
    }

    pub fn with_config(list: SourceList, env: Environment, config: SelectConfig) -> Self {
        init_tracing();
        let host = Host::default();
        let mut select = Select::new(
            list.clone(),
            Box::new(host.clone()),
            Box::new(host.clone()),
            env,
            config,
        )
        .unwrap()
        .with_dropdown(Box::new(host.clone()));
        let start = Instant::now();
        select.mount(start).unwrap();
        Self {
            select,
            list,
            host,
            start,
        }
    }

    /// The synthetic time `ms` milliseconds after mount.
    pub fn at(&self, ms: u64) -> Instant {
        self.start + Duration::from_millis(ms)
    }

    pub fn key(&mut self, key: Key, ms: u64) -> EventDisposition {
        let now = self.at(ms);
        self.select.on_key_down(&KeyPressEvent::key(key), now)
    }

    pub fn type_char(&mut self, ch: char, ms: u64) -> EventDisposition {
        let now = self.at(ms);
        self.select.on_key_down(&KeyPressEvent::character(ch), now)
    }

    pub fn advance(&mut self, ms: u64) {
        let now = self.at(ms);
        self.select.advance(now);
    }

    /// Pointer target of the option at `index` in the options view.
    pub fn item(&self, index: usize) -> PointerTarget {
        let node = self
            .select
            .options_view()
            .mirror()
            .options()
            .nth(index)
            .unwrap();
        PointerTarget::Item(node.id)
    }

    pub fn selected_text(&self) -> Option<String> {
        self.list.selected_option().map(|option| option.text)
    }
}
