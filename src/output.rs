//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use crate::{DownloadLinks, Investigation, Product};

/// Trait for human-readable key-value output.
///
/// Implemented by entity types to provide formatted output
/// suitable for terminal display when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

fn join_refs(refs: &[crate::Reference]) -> String {
    refs.iter()
        .map(|r| r.id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl PrettyPrint for Product {
    fn pretty_print(&self) -> String {
        let id = self.identifier().unwrap_or("(no identifier)");
        let divider = "─".repeat(id.len().max(30));

        let mut lines = vec![format!("Product: {}", id), divider];

        if let Some(ref title) = self.title {
            lines.push(format!("Title:          {}", title));
        }

        if let Some(ref product_type) = self.product_type {
            lines.push(format!("Type:           {}", product_type));
        }

        if let Some(version) = self.version() {
            lines.push(format!("Version:        {}", version));
        }

        match (self.start_time(), self.stop_time()) {
            (Some(start), Some(stop)) => lines.push(format!(
                "Time:           {} to {}",
                start.format("%Y-%m-%d %H:%M:%S UTC"),
                stop.format("%Y-%m-%d %H:%M:%S UTC")
            )),
            (Some(start), None) => lines.push(format!(
                "Start:          {}",
                start.format("%Y-%m-%d %H:%M:%S UTC")
            )),
            _ => {}
        }

        if !self.investigations.is_empty() {
            lines.push(format!("Investigations: {}", join_refs(&self.investigations)));
        }

        if !self.targets.is_empty() {
            lines.push(format!("Targets:        {}", join_refs(&self.targets)));
        }

        if let Some(node) = self.metadata.as_ref().and_then(|m| m.node_name.as_deref()) {
            lines.push(format!("Node:           {}", node));
        }

        if let Some(label) = self.label_url() {
            lines.push(format!("Label:          {}", label));
        }

        if let Some(ref description) = self.description {
            lines.push(String::new());
            lines.push(description.trim().to_string());
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Investigation {
    fn pretty_print(&self) -> String {
        let divider = "─".repeat(self.lid.len().max(30));

        let mut lines = vec![format!("Investigation: {}", self.lid), divider];

        if let Some(ref title) = self.title {
            lines.push(format!("Title:          {}", title));
        }

        if let Some(ref kind) = self.investigation_type {
            lines.push(format!("Type:           {}", kind));
        }

        let start = self.start_date.as_deref().unwrap_or("?");
        let stop = if self.is_ongoing() {
            "ongoing"
        } else {
            self.stop_date.as_deref().unwrap_or("?")
        };
        lines.push(format!("Dates:          {} to {}", start, stop));

        if let Some(ref description) = self.description {
            lines.push(String::new());
            lines.push(description.trim().to_string());
        }

        lines.join("\n")
    }
}

impl PrettyPrint for DownloadLinks {
    fn pretty_print(&self) -> String {
        let divider = "─".repeat(self.identifier.len().max(30));

        let mut lines = vec![format!("Links: {}", self.identifier), divider];

        if let Some(ref title) = self.title {
            lines.push(format!("Title:          {}", title));
        }

        if self.is_empty() {
            lines.push("No files registered".to_string());
            return lines.join("\n");
        }

        if let Some(ref label) = self.label {
            lines.push(format!("Label:          {}", label.url));
        }

        for file in &self.files {
            match file.size {
                Some(size) => lines.push(format!("File:           {} ({} bytes)", file.url, size)),
                None => lines.push(format!("File:           {}", file.url)),
            }
        }

        lines.join("\n")
    }
}
