//! Main application state and update loop

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use alloy::primitives::Address;
use eframe::egui;

use wave_portal_client_adapters::{
    Eip1193WalletAdapter, PortalAdapter, PortalAdapterConfig, SystemClockAdapter,
};
use wave_portal_client_core::{
    ClientOptions, PortError, SubmissionState, SubmitOutcome, WaveClient,
};

use crate::state::{short_address, ViewSnapshot};
use crate::ui;

pub type Client = WaveClient<Eip1193WalletAdapter, PortalAdapter, SystemClockAdapter>;

/// Result from an async connect operation
#[derive(Clone)]
pub enum ConnectResult {
    Connected(Address),
    ProviderMissing,
    Failed(String),
}

/// Result from an async wave submission
#[derive(Clone)]
pub enum SubmitResult {
    Confirmed,
    Failed(String),
}

/// The main application state
pub struct App {
    /// The client owns every piece of reconciled state; workers and the
    /// render loop share it one discrete operation at a time.
    client: Arc<Mutex<Client>>,
    /// Adapter handle driving the background event poll.
    portal: PortalAdapter,
    poll_interval: Duration,
    /// Pending message bound to the input field
    message_input: String,
    /// Last captured render snapshot
    view: ViewSnapshot,
    /// Async connect result receiver
    connect_result: Arc<Mutex<Option<ConnectResult>>>,
    /// Async submit result receiver
    submit_result: Arc<Mutex<Option<SubmitResult>>>,
    connect_in_flight: bool,
    submit_in_flight: bool,
    startup_done: bool,
    /// Connection error surfaced in the UI (provider missing)
    last_error: Option<String>,
}

impl App {
    /// Create a new App instance
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let config = PortalAdapterConfig::from_env();
        let wallet = Eip1193WalletAdapter::with_config(&config);
        let portal = PortalAdapter::with_config(&config);
        let options = ClientOptions {
            gas_limit: config.wave_gas_limit,
            notification_ttl_ms: config.notification_ttl_ms,
        };
        let client = WaveClient::new(wallet, portal.clone(), SystemClockAdapter, options);

        Self {
            client: Arc::new(Mutex::new(client)),
            portal,
            poll_interval: Duration::from_millis(config.event_poll_interval_ms),
            message_input: String::new(),
            view: ViewSnapshot::default(),
            connect_result: Arc::new(Mutex::new(None)),
            submit_result: Arc::new(Mutex::new(None)),
            connect_in_flight: false,
            submit_in_flight: false,
            startup_done: false,
            last_error: None,
        }
    }

    fn startup(&mut self, ctx: &egui::Context) {
        {
            let mut client = self.client.lock().unwrap();
            if let Err(err) = client.ensure_subscribed() {
                tracing::warn!(%err, "event subscription unavailable");
            }
        }
        self.spawn_detect(ctx);
        self.spawn_event_poll(ctx.clone());
    }

    /// Startup probe for an already-authorized wallet; failures are silent.
    fn spawn_detect(&self, ctx: &egui::Context) {
        let client = Arc::clone(&self.client);
        let ctx = ctx.clone();
        thread::spawn(move || {
            let detected = { client.lock().unwrap().detect_existing_connection() };
            if let Err(err) = detected {
                tracing::debug!(%err, "startup wallet detection failed");
            }
            ctx.request_repaint();
        });
    }

    /// Background poll pulling gateway-side events into the adapter queue;
    /// the render loop drains them through the client.
    fn spawn_event_poll(&self, ctx: egui::Context) {
        let portal = self.portal.clone();
        let interval = self.poll_interval;
        thread::spawn(move || loop {
            thread::sleep(interval);
            match portal.sync() {
                Ok(0) => {}
                Ok(_) => ctx.request_repaint(),
                Err(err) => tracing::debug!(%err, "event poll failed"),
            }
        });
    }

    fn trigger_connect(&mut self, ctx: &egui::Context) {
        if self.connect_in_flight {
            return;
        }
        self.connect_in_flight = true;
        let client = Arc::clone(&self.client);
        let result = Arc::clone(&self.connect_result);
        let ctx = ctx.clone();
        thread::spawn(move || {
            let connect = { client.lock().unwrap().connect() };
            let mut guard = result.lock().unwrap();
            *guard = Some(match connect {
                Ok(address) => ConnectResult::Connected(address),
                Err(PortError::ProviderUnavailable) => ConnectResult::ProviderMissing,
                Err(err) => ConnectResult::Failed(format!("{err}")),
            });
            ctx.request_repaint();
        });
    }

    fn trigger_submit(&mut self, ctx: &egui::Context) {
        if self.submit_in_flight {
            return;
        }
        self.submit_in_flight = true;
        let message = self.message_input.clone();
        let client = Arc::clone(&self.client);
        let result = Arc::clone(&self.submit_result);
        let ctx = ctx.clone();
        thread::spawn(move || {
            let outcome = { client.lock().unwrap().submit_wave(&message) };
            let mut guard = result.lock().unwrap();
            *guard = Some(match outcome {
                Ok(SubmitOutcome::Confirmed { .. }) => SubmitResult::Confirmed,
                Ok(SubmitOutcome::Failed { error }) => SubmitResult::Failed(format!("{error}")),
                Err(err) => SubmitResult::Failed(format!("{err}")),
            });
            ctx.request_repaint();
        });
    }

    fn check_connect_result(&mut self) {
        let result = { self.connect_result.lock().unwrap().take() };
        let Some(result) = result else {
            return;
        };
        self.connect_in_flight = false;
        match result {
            ConnectResult::Connected(address) => {
                self.last_error = None;
                tracing::debug!(account = %address, "connect completed");
            }
            ConnectResult::ProviderMissing => {
                self.last_error = Some(ui::INSTALL_WALLET_PROMPT.to_owned());
            }
            ConnectResult::Failed(reason) => {
                // Declined prompts and transport hiccups stay in the log.
                tracing::info!(%reason, "wallet connection not completed");
            }
        }
    }

    fn check_submit_result(&mut self) {
        let result = { self.submit_result.lock().unwrap().take() };
        let Some(result) = result else {
            return;
        };
        self.submit_in_flight = false;
        match result {
            SubmitResult::Confirmed => {}
            SubmitResult::Failed(reason) => {
                // The client already armed the toast; nothing else to show.
                tracing::debug!(%reason, "submission reported failure");
            }
        }
    }

    /// Drain events, tick the toast timer and re-capture the snapshot. Uses
    /// try_lock so a slow worker operation never stalls a frame; the last
    /// snapshot stays on screen until the client is free again.
    fn refresh_view(&mut self) {
        let Ok(mut client) = self.client.try_lock() else {
            return;
        };
        if let Err(err) = client.pump_events() {
            tracing::debug!(%err, "event pump failed");
        }
        if let Err(err) = client.tick() {
            tracing::debug!(%err, "toast tick failed");
        }
        if client.revision() != self.view.revision || self.view.revision == 0 {
            self.view = ViewSnapshot::capture(&client);
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(egui::Visuals::dark());

        if !self.startup_done {
            self.startup_done = true;
            self.startup(ctx);
        }

        self.check_connect_result();
        self.check_submit_result();
        self.refresh_view();

        let mut wants_connect = false;
        let mut wants_submit = false;

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.heading(
                    egui::RichText::new("👋 Wave Portal")
                        .size(22.0)
                        .color(egui::Color32::from_rgb(32, 178, 170)),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    match self.view.account {
                        Some(account) => {
                            let full = account.to_string();
                            if ui
                                .small_button("📋")
                                .on_hover_text("Copy address")
                                .clicked()
                            {
                                ui::copy_to_clipboard(&full);
                            }
                            ui.label(
                                egui::RichText::new(short_address(&account))
                                    .monospace()
                                    .small(),
                            )
                            .on_hover_text(full);
                        }
                        None => {
                            ui.label(egui::RichText::new("not connected").weak().small());
                        }
                    }
                });
            });
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(10.0);
                ui.label("Connect your Ethereum wallet and wave with your favorite Disney movie.");
                ui.add_space(12.0);

                ui.horizontal(|ui| {
                    ui.label("Message:");
                    ui.add(
                        egui::TextEdit::singleline(&mut self.message_input)
                            .hint_text("Your favorite Disney movie...")
                            .desired_width(360.0),
                    );
                });
                ui.add_space(8.0);

                ui.horizontal(|ui| {
                    let can_wave = self.view.account.is_some()
                        && !self.submit_in_flight
                        && self.view.submission != SubmissionState::Mining
                        && !self.message_input.trim().is_empty();
                    if ui
                        .add_enabled(can_wave, egui::Button::new("👋 Wave at Me"))
                        .clicked()
                    {
                        wants_submit = true;
                    }
                    ui.add_space(12.0);
                    ui.label(format!("Total waves: {}", self.view.wave_count));
                });

                if self.submit_in_flight || self.view.submission == SubmissionState::Mining {
                    ui.add_space(8.0);
                    ui::loading_spinner(ui, "Mining...");
                }

                if self.view.account.is_none() {
                    ui.add_space(12.0);
                    if ui
                        .add_enabled(!self.connect_in_flight, egui::Button::new("Connect Wallet"))
                        .clicked()
                    {
                        wants_connect = true;
                    }
                    if self.connect_in_flight {
                        ui.add_space(4.0);
                        ui::loading_spinner(ui, "Waiting for wallet...");
                    }
                }

                if let Some(error) = &self.last_error {
                    ui.add_space(8.0);
                    ui::error_message(ui, error);
                }

                if !self.view.waves.is_empty() {
                    ui::section_header(ui, "Waves");
                    for row in &self.view.waves {
                        egui::Frame::group(ui.style()).show(ui, |ui| {
                            ui.horizontal(|ui| {
                                ui.label(egui::RichText::new(&row.address).monospace().small());
                                if ui
                                    .small_button("📋")
                                    .on_hover_text("Copy address")
                                    .clicked()
                                {
                                    ui::copy_to_clipboard(&row.address);
                                }
                                if ui
                                    .small_button("🔗")
                                    .on_hover_text("Open in block explorer")
                                    .clicked()
                                {
                                    ui::open_url_new_tab(&ui::explorer_address_url(&row.address));
                                }
                            });
                            ui.label(egui::RichText::new(&row.timestamp).weak().small());
                            ui.label(&row.message);
                        });
                        ui.add_space(6.0);
                    }
                }

                ui.add_space(20.0);
            });
        });

        if let Some(toast) = &self.view.toast {
            ui::toast(ctx, toast);
        }

        if wants_connect {
            self.trigger_connect(ctx);
        }
        if wants_submit {
            self.trigger_submit(ctx);
        }

        // Keep the toast timer and event drain moving without user input.
        ctx.request_repaint_after(Duration::from_millis(250));
    }
}
