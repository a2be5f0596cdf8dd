//! UI helper components

/// Shown when no wallet provider can be reached.
pub const INSTALL_WALLET_PROMPT: &str =
    "No wallet provider found. Install a browser wallet or point WAVE_PORTAL_PROVIDER_PROXY_URL at one.";

/// Section header with separator
pub fn section_header(ui: &mut egui::Ui, text: &str) {
    ui.add_space(10.0);
    ui.label(egui::RichText::new(text).strong().size(14.0));
    ui.separator();
}

pub fn error_message(ui: &mut egui::Ui, text: &str) {
    ui.label(egui::RichText::new(format!("❌ {text}")).color(egui::Color32::from_rgb(220, 80, 80)));
}

pub fn loading_spinner(ui: &mut egui::Ui, text: &str) {
    ui.horizontal(|ui| {
        ui.spinner();
        ui.label(text);
    });
}

/// Transient toast overlay, anchored to the top-right corner.
pub fn toast(ctx: &egui::Context, text: &str) {
    egui::Area::new(egui::Id::new("toast"))
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-16.0, 16.0))
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.label(egui::RichText::new(text).strong());
            });
        });
}

pub fn copy_to_clipboard(text: &str) {
    match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text.to_owned())) {
        Ok(()) => {}
        Err(err) => tracing::debug!(%err, "clipboard unavailable"),
    }
}

pub fn explorer_address_url(address: &str) -> String {
    format!("https://etherscan.io/address/{address}")
}

/// Open URL in the system browser
pub fn open_url_new_tab(url: &str) {
    let _ = open::that(url);
}
