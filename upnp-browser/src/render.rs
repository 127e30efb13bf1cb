//! Plain-text rendering of discovery results, descriptions and content trees

use std::fmt::Write;
use std::sync::Arc;

use crate::tree_walk::TreeEntry;
use upnp_discovery::{Device, RootDevice};

/// One line per root device: origin, location and server banner
pub fn root_devices(devices: &[Arc<RootDevice>]) -> String {
    if devices.is_empty() {
        return "No devices found.\n".to_string();
    }

    let width = devices
        .iter()
        .map(|d| d.origin.to_string().len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for device in devices {
        let _ = write!(out, "{:<width$}  {}", device.origin.to_string(), device.location, width = width);
        if let Some(server) = &device.server {
            let _ = write!(out, "  [{}]", server);
        }
        out.push('\n');
    }
    out
}

/// Device identity followed by its services
pub fn device(device: &Device) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", device.friendly_name);
    let _ = writeln!(out, "  Type:          {}", device.device_type);
    let _ = writeln!(out, "  Manufacturer:  {}", device.manufacturer);
    let _ = writeln!(out, "  Model:         {} {}", device.model_name, device.model_number);
    let _ = writeln!(out, "  Serial number: {}", device.serial_number);
    let _ = writeln!(out, "  UDN:           {}", device.udn);
    if !device.presentation_url.is_empty() {
        let _ = writeln!(out, "  Presentation:  {}", device.presentation_url);
    }

    let _ = writeln!(out, "  Services:");
    for service in &device.services {
        let marker = if service.is_content_directory() { "*" } else { " " };
        let _ = writeln!(out, "  {} {}", marker, service.service_id);
        let _ = writeln!(out, "      type:    {}", service.service_type);
        let _ = writeln!(out, "      control: {}", service.control_url);
        let _ = writeln!(out, "      SCPD:    {}", service.description_url);
        let _ = writeln!(out, "      events:  {}", service.event_subscription_url);
    }
    out
}

/// Indented tree; containers end with `/`, items show their resource URL
pub fn tree(entries: &[TreeEntry]) -> String {
    let mut out = String::new();
    write_entries(&mut out, entries, 0);
    out
}

fn write_entries(out: &mut String, entries: &[TreeEntry], indent: usize) {
    for entry in entries {
        let pad = "  ".repeat(indent);
        match (entry.kind, &entry.location) {
            ("item", Some(location)) => {
                let _ = writeln!(out, "{}{}  <{}>", pad, entry.label, location);
            }
            ("container", _) => {
                let _ = writeln!(out, "{}{}/", pad, entry.label);
            }
            _ => {
                let _ = writeln!(out, "{}{}", pad, entry.label);
            }
        }
        write_entries(out, &entry.children, indent + 1);
    }
}
