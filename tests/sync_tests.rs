use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};

use footquill::config::{Config, DisplayStyle};
use footquill::sync::element::{BackrefContent, BackrefElement, RenderError, DEFAULT_BACKREF_TEXT};
use footquill::sync::{RenderedBackref, SyncOutcome, SyncReport, Synchronizer};

const TEXT: &str = "This is a test[^1] with footnotes[^video].\n\n[^1]: Numeric footnote definition.\n[^video]: Video reference definition.\n";

fn report(outcome: SyncOutcome) -> SyncReport {
    *outcome.report().expect("pass should complete")
}

/// Element whose host refuses the first `failures` content updates.
struct FlakyElement {
    href: String,
    failures: usize,
    processed: bool,
    text: Option<String>,
}

impl FlakyElement {
    fn new(label: &str, failures: usize) -> Self {
        Self {
            href: format!("#fnref:{}", label),
            failures,
            processed: false,
            text: None,
        }
    }
}

impl BackrefElement for FlakyElement {
    fn navigation_target(&self) -> Option<&str> {
        Some(self.href.as_str())
    }

    fn is_processed(&self) -> bool {
        self.processed
    }

    fn mark_processed(&mut self) {
        self.processed = true;
    }

    fn set_visible_content(&mut self, content: BackrefContent) -> Result<(), RenderError> {
        if self.failures > 0 {
            self.failures -= 1;
            return Err(RenderError::Detached);
        }
        self.text = Some(content.text);
        Ok(())
    }
}

#[test]
fn test_rewrites_matching_backreferences() {
    let sync = Synchronizer::new();
    let mut elements = vec![
        RenderedBackref::for_label("1"),
        RenderedBackref::for_label("video"),
    ];

    let report = report(sync.synchronize("test.md", TEXT, &mut elements, &Config::default()));

    assert_eq!(report.rewritten, 2);
    assert_eq!(elements[0].text(), "[1]");
    assert_eq!(elements[1].text(), "[video]");
    assert!(elements.iter().all(|e| e.is_processed()));
    assert_eq!(elements[0].navigation_target(), Some("#fnref:1"));
}

#[test]
fn test_second_pass_is_a_no_op() {
    let sync = Synchronizer::new();
    let config = Config::default();
    let mut elements = vec![RenderedBackref::for_label("1")];

    sync.synchronize("test.md", TEXT, &mut elements, &config);
    let after_first = elements.clone();
    let second = report(sync.synchronize("test.md", TEXT, &mut elements, &config));

    assert_eq!(second.rewritten, 0);
    assert_eq!(second.already_processed, 1);
    assert_eq!(elements, after_first);
    assert_eq!(elements[0].text(), "[1]");
}

#[test]
fn test_unknown_label_is_left_untouched() {
    let sync = Synchronizer::new();
    let mut elements = vec![
        RenderedBackref::for_label("missing"),
        RenderedBackref::new("#fn:1"),
        RenderedBackref::without_target(),
    ];

    let report = report(sync.synchronize("test.md", TEXT, &mut elements, &Config::default()));

    assert_eq!(report.unmatched, 3);
    for element in &elements {
        assert_eq!(element.text(), DEFAULT_BACKREF_TEXT);
        assert!(!element.is_processed());
    }
}

#[test]
fn test_index_is_cached_per_document() {
    let sync = Synchronizer::new();
    let config = Config::default();
    let mut elements = vec![RenderedBackref::for_label("1")];

    sync.synchronize("test.md", TEXT, &mut elements, &config);
    assert_eq!(sync.cached_documents(), 1);
    assert!(sync.cached("test.md").unwrap().contains("video"));

    // A changed text is not re-read until the cache entry is invalidated.
    let mut fresh = vec![RenderedBackref::for_label("new")];
    let changed = "Now[^new]\n\n[^new]: added";
    let stale = report(sync.synchronize("test.md", changed, &mut fresh, &config));
    assert_eq!(stale.unmatched, 1);

    assert!(sync.invalidate("test.md"));
    let rebuilt = report(sync.synchronize("test.md", changed, &mut fresh, &config));
    assert_eq!(rebuilt.rewritten, 1);
    assert_eq!(fresh[0].text(), "[new]");
}

#[test]
fn test_clear_drops_every_document() {
    let sync = Synchronizer::new();
    let mut elements: Vec<RenderedBackref> = Vec::new();
    sync.synchronize("a.md", TEXT, &mut elements, &Config::default());
    sync.synchronize("b.md", TEXT, &mut elements, &Config::default());
    assert_eq!(sync.cached_documents(), 2);

    sync.clear();
    assert_eq!(sync.cached_documents(), 0);
}

#[test]
fn test_reentrant_call_for_same_document_is_dropped() {
    let config = Config {
        enable_performance_mode: true,
        ..Config::default()
    };
    let sync = Synchronizer::new();
    let mut elements: Vec<RenderedBackref> =
        (0..120).map(|_| RenderedBackref::for_label("1")).collect();
    let nested: Cell<Option<SyncOutcome>> = Cell::new(None);
    let other: Cell<Option<SyncOutcome>> = Cell::new(None);

    let outer = sync.synchronize_with("test.md", TEXT, &mut elements, &config, || {
        assert!(sync.is_in_flight("test.md"));
        let mut more = vec![RenderedBackref::for_label("video")];
        nested.set(Some(sync.synchronize("test.md", TEXT, &mut more, &config)));
        other.set(Some(sync.synchronize("other.md", TEXT, &mut more, &config)));
    });

    assert_eq!(nested.get(), Some(SyncOutcome::Busy));
    assert!(matches!(other.get(), Some(SyncOutcome::Completed(_))));
    assert_eq!(report(outer).rewritten, 120);
    assert!(!sync.is_in_flight("test.md"));
}

#[test]
fn test_batches_only_in_performance_mode() {
    let sync = Synchronizer::new();
    let mut elements: Vec<RenderedBackref> =
        (0..120).map(|_| RenderedBackref::for_label("1")).collect();
    let yields = Cell::new(0);

    let normal = sync.synchronize_with("a.md", TEXT, &mut elements, &Config::default(), || {
        yields.set(yields.get() + 1)
    });
    assert_eq!(report(normal).batches, 1);
    assert_eq!(yields.get(), 0);

    let config = Config {
        enable_performance_mode: true,
        ..Config::default()
    };
    let mut elements: Vec<RenderedBackref> =
        (0..120).map(|_| RenderedBackref::for_label("1")).collect();
    let batched = report(sync.synchronize_with("b.md", TEXT, &mut elements, &config, || {
        yields.set(yields.get() + 1)
    }));

    assert_eq!(batched.batches, 3);
    assert_eq!(batched.rewritten, 120);
    assert_eq!(yields.get(), 2);
}

#[test]
fn test_small_sets_are_not_batched_in_performance_mode() {
    let config = Config {
        enable_performance_mode: true,
        ..Config::default()
    };
    let sync = Synchronizer::new();
    let mut elements: Vec<RenderedBackref> =
        (0..100).map(|_| RenderedBackref::for_label("1")).collect();

    assert_eq!(report(sync.synchronize("a.md", TEXT, &mut elements, &config)).batches, 1);
}

#[test]
fn test_performance_mode_caps_the_index() {
    let config = Config {
        enable_performance_mode: true,
        max_footnotes_per_document: 1,
        ..Config::default()
    };
    let sync = Synchronizer::new();
    let mut elements = vec![
        RenderedBackref::for_label("1"),
        RenderedBackref::for_label("video"),
    ];

    let report = report(sync.synchronize("test.md", TEXT, &mut elements, &config));

    assert_eq!(report.rewritten, 1);
    assert_eq!(report.unmatched, 1);
    assert_eq!(elements[1].text(), DEFAULT_BACKREF_TEXT);
}

#[test]
fn test_failed_element_does_not_stop_the_pass() {
    let sync = Synchronizer::new();
    let mut elements = vec![FlakyElement::new("1", 1), FlakyElement::new("video", 0)];

    let first = report(sync.synchronize("test.md", TEXT, &mut elements, &Config::default()));
    assert_eq!(first.failed, 1);
    assert_eq!(first.rewritten, 1);
    assert!(!elements[0].processed);
    assert_eq!(elements[1].text.as_deref(), Some("[video]"));
    assert!(!sync.is_in_flight("test.md"));

    let retry = report(sync.synchronize("test.md", TEXT, &mut elements, &Config::default()));
    assert_eq!(retry.rewritten, 1);
    assert_eq!(elements[0].text.as_deref(), Some("[1]"));
}

#[test]
fn test_content_carries_markup_tooltip_and_hover() {
    let config = Config {
        display_style: DisplayStyle::Superscript,
        show_tooltips: true,
        enable_hover_effects: false,
        ..Config::default()
    };
    let sync = Synchronizer::new();
    let mut elements = vec![RenderedBackref::for_label("video")];

    sync.synchronize("test.md", TEXT, &mut elements, &config);

    let content = elements[0].content().unwrap();
    assert_eq!(content.text, "<sup>video</sup>");
    assert!(content.is_markup);
    assert_eq!(content.tooltip.as_deref(), Some("Back to footnote: video"));
    assert!(!content.hover);
    assert_eq!(
        elements[0].to_html(),
        "<a class=\"footnote-backref\" href=\"#fnref:video\" data-custom-backref=\"true\" \
         title=\"Back to footnote: video\"><span class=\"custom-backref-text\"><sup>video</sup></span></a>"
    );
}

#[test]
fn test_superscript_label_cannot_inject_markup() {
    let label = "1<img src=x onerror=alert(1)>";
    let text = format!("Body[^{0}]\n\n[^{0}]: note", label);
    let config = Config {
        display_style: DisplayStyle::Superscript,
        ..Config::default()
    };
    let sync = Synchronizer::new();
    let mut elements = vec![RenderedBackref::for_label(label)];

    assert_eq!(report(sync.synchronize("evil.md", &text, &mut elements, &config)).rewritten, 1);

    let html = elements[0].to_html();
    assert!(!html.contains("<img"));
    assert!(html.contains("<sup>[1&lt;img src=x onerror=alert(1)&gt;]</sup>"));
}

/// Element whose host blows up while its content is replaced.
struct PanickingElement;

impl BackrefElement for PanickingElement {
    fn navigation_target(&self) -> Option<&str> {
        Some("#fnref:1")
    }

    fn is_processed(&self) -> bool {
        false
    }

    fn mark_processed(&mut self) {}

    fn set_visible_content(&mut self, _content: BackrefContent) -> Result<(), RenderError> {
        panic!("host element went away mid-update");
    }
}

#[test]
fn test_panicking_element_releases_the_document() {
    let sync = Synchronizer::new();
    let mut elements = vec![PanickingElement];

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        sync.synchronize("test.md", TEXT, &mut elements, &Config::default())
    }));

    assert!(result.is_err());
    assert!(!sync.is_in_flight("test.md"));

    let mut retry = vec![RenderedBackref::for_label("1")];
    let outcome = sync.synchronize("test.md", TEXT, &mut retry, &Config::default());
    assert_eq!(report(outcome).rewritten, 1);
}
