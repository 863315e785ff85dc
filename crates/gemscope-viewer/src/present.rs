//! Summary Presenters
//!
//! The aggregation results are handed to a [`Presenter`], which renders the
//! loading, summary, "no diamonds found", and error states. Presentation is
//! driven by the viewer's explicit load-completion call, never by a timer.

use std::fmt::Write;

use gemscope_measure::{DiamondGroup, DiamondSummary};

/// Sink for aggregation results and viewer status
pub trait Presenter {
    /// A model load has started
    fn loading(&mut self);

    /// A populated diamond summary is available
    fn summary(&mut self, summary: &DiamondSummary);

    /// The model loaded but contained no diamond-marked meshes
    fn empty(&mut self);

    /// A load or measurement failure; the viewer remains usable
    fn error(&mut self, message: &str);
}

/// Width and height are within display tolerance of each other, so the
/// group is reported with a diameter line
fn shows_diameter(group: &DiamondGroup) -> bool {
    (group.width - group.height).abs() < 0.1
}

/// Plain-text presenter used by the CLI
#[derive(Debug, Default)]
pub struct TextPresenter {
    out: String,
}

impl TextPresenter {
    /// Create a new text presenter
    pub fn new() -> Self {
        Self::default()
    }

    /// Rendered output so far
    pub fn output(&self) -> &str {
        &self.out
    }
}

impl Presenter for TextPresenter {
    fn loading(&mut self) {
        self.out.clear();
        self.out.push_str("Loading model...\n");
    }

    fn summary(&mut self, summary: &DiamondSummary) {
        self.out.clear();
        let _ = writeln!(self.out, "Total diamonds: {}", summary.total);
        for group in &summary.groups {
            let _ = writeln!(self.out);
            let _ = writeln!(self.out, "Size: {} mm  (count {})", group.key, group.count);
            let _ = writeln!(self.out, "  Height: {:.2} mm", group.depth);
            if shows_diameter(group) {
                let _ = writeln!(self.out, "  Diameter: {:.2} mm", group.width);
            }
            let _ = writeln!(self.out, "  Shape: {}", group.shape);
        }
    }

    fn empty(&mut self) {
        self.out.clear();
        self.out.push_str(
            "No diamonds found in the model. Make sure your model contains \
             meshes with \"diamond\" in their names.\n",
        );
    }

    fn error(&mut self, message: &str) {
        self.out.clear();
        let _ = writeln!(self.out, "Error: {}", message);
    }
}

/// HTML panel presenter mirroring the viewer's summary sidebar
#[derive(Debug, Default)]
pub struct HtmlPresenter {
    html: String,
}

impl HtmlPresenter {
    /// Create a new HTML presenter
    pub fn new() -> Self {
        Self::default()
    }

    /// Rendered panel markup
    pub fn html(&self) -> &str {
        &self.html
    }
}

impl Presenter for HtmlPresenter {
    fn loading(&mut self) {
        self.html = String::from(r#"<div class="summary-loading">Loading model...</div>"#);
    }

    fn summary(&mut self, summary: &DiamondSummary) {
        let mut html = String::new();
        let _ = write!(
            html,
            r#"<div class="summary-total"><p>Total Diamonds: {}</p></div>"#,
            summary.total
        );

        html.push_str(r#"<div class="summary-groups">"#);
        for group in &summary.groups {
            let _ = write!(
                html,
                r#"<div class="summary-group"><h3>Size: {} mm</h3><span class="count">Count: {}</span>"#,
                group.key, group.count
            );
            let _ = write!(html, "<div>Height: {:.2} mm</div>", group.depth);
            if shows_diameter(group) {
                let _ = write!(html, "<div>Diameter: {:.2} mm</div>", group.width);
            }
            let _ = write!(html, "<div>Shape: {}</div>", group.shape);
            html.push_str("</div>");
        }
        html.push_str("</div>");

        self.html = html;
    }

    fn empty(&mut self) {
        self.html = String::from(
            r#"<div class="summary-empty"><p>No diamonds found in the model. Make sure your model contains meshes with "diamond" in their names.</p></div>"#,
        );
    }

    fn error(&mut self, message: &str) {
        self.html = format!(
            r#"<div class="summary-error"><p>Error creating diamond summary: {}</p></div>"#,
            message
        );
    }
}
