//! Card printer hand-off
//!
//! Sending the card to a printer is not supported yet. This only reports
//! what would happen.
use std::path::Path;

use idcard::card::PrinterSettings;
use log::info;

/// The printer address as `ip:port`
pub fn destination(settings: &PrinterSettings) -> String {
    format!(
        "{}:{}",
        settings.ip_address.as_deref().unwrap_or_default(),
        settings.port
    )
}

/// Report the print job for `card`
pub fn print_card(settings: &PrinterSettings, card: &Path) {
    if settings.enable_physical_printing {
        info!(
            "Printing `{}` on {}",
            card.display(),
            destination(settings)
        );
        info!("Physical printing is not implemented, nothing was sent");
    } else {
        info!("Physical printing is disabled (EnablePhysicalPrinting: false)");
    }
}

#[cfg(test)]
mod tests {
    use idcard::card::PrinterSettings;

    use super::destination;

    #[test]
    fn test_destination() {
        let settings = PrinterSettings {
            enable_physical_printing: true,
            ip_address: Some("192.168.1.50".to_owned()),
            port: 9100,
        };
        assert_eq!(destination(&settings), "192.168.1.50:9100");
        assert_eq!(destination(&PrinterSettings::default()), ":0");
    }
}
