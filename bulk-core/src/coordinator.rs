//! Block-aware batching of commands into bulks

use crate::bulk::{Bulk, BulkView, SharedBulk};
use crate::classifier::{LineClassifier, LineKind};
use crate::config::CoordinatorConfig;
use crate::error::{BulkError, Result};
use crate::sink::Sink;
use std::cell::RefCell;
use std::num::NonZeroUsize;
use std::rc::{Rc, Weak};

/// Effective group-size target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupSize {
    /// No size configured yet; submissions are rejected
    Unset,
    /// Inside a block; no size-triggered flush
    Unbounded,
    /// Flush when the bulk reaches this many commands
    Fixed(usize),
}

/// Groups submitted lines into bulks and publishes them to sinks.
///
/// Sinks are held through weak handles. A sink dropped by its owner is
/// skipped and pruned on the next notification.
pub struct BulkCoordinator {
    bulk: SharedBulk,
    classifier: LineClassifier,
    size: Option<NonZeroUsize>,
    in_block: bool,
    config: CoordinatorConfig,
    sinks: Vec<Weak<RefCell<dyn Sink>>>,
}

impl Default for BulkCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl BulkCoordinator {
    /// Create an unconfigured coordinator with default settings
    pub fn new() -> Self {
        Self::with_config(CoordinatorConfig::default())
    }

    /// Create an unconfigured coordinator
    pub fn with_config(config: CoordinatorConfig) -> Self {
        Self {
            bulk: Rc::new(RefCell::new(Bulk::new())),
            classifier: LineClassifier::new(),
            size: None,
            in_block: false,
            config,
            sinks: Vec::new(),
        }
    }

    /// Subscribe a sink. The coordinator keeps only a weak handle.
    pub fn subscribe<S: Sink + 'static>(&mut self, sink: &Rc<RefCell<S>>) -> Result<()> {
        sink.borrow_mut().update(&self.view())?;
        let sink: Rc<RefCell<dyn Sink>> = sink.clone();
        self.sinks.push(Rc::downgrade(&sink));
        Ok(())
    }

    /// Number of subscribed sinks that are still alive
    pub fn subscriber_count(&self) -> usize {
        self.sinks
            .iter()
            .filter(|sink| sink.strong_count() > 0)
            .count()
    }

    /// Set the group size.
    ///
    /// Fails if `size` is zero or smaller than the number of buffered
    /// commands. Outside a block, a bulk that already holds `size` commands
    /// is flushed immediately. Closing a block replaces the size with the
    /// length of that block.
    pub fn configure(&mut self, size: usize) -> Result<()> {
        let buffered = self.buffered();
        let size = NonZeroUsize::new(size)
            .filter(|size| size.get() >= buffered)
            .ok_or(BulkError::InvalidConfiguration {
                requested: size,
                buffered,
            })?;

        self.size = Some(size);
        log::info!("group size set to {size}");

        if !self.in_block && buffered == size.get() {
            self.flush()?;
        }
        Ok(())
    }

    /// Submit one input line
    pub fn submit(&mut self, line: &str) -> Result<()> {
        let len = line.chars().count();
        if len > self.config.max_line_len {
            return Err(BulkError::LineTooLong {
                len,
                max: self.config.max_line_len,
            });
        }
        let size = self.size.ok_or(BulkError::NotConfigured)?;

        match self.classifier.classify(line) {
            LineKind::Command => {
                self.bulk.borrow_mut().push(line);
                let view = self.view();
                self.notify(|sink| sink.update(&view))?;
                if !self.in_block && self.buffered() >= size.get() {
                    self.flush()?;
                }
            }
            LineKind::StartBlock => {
                if self.buffered() > 0 {
                    self.flush()?;
                }
                self.in_block = true;
                log::debug!("block opened");
            }
            LineKind::CancelBlock => {
                self.in_block = false;
                let closed =
                    NonZeroUsize::new(self.buffered()).ok_or(BulkError::EmptyBlockClose)?;
                self.size = Some(closed);
                log::debug!("block closed, group size now {closed}");
                self.flush()?;
            }
            LineKind::Nested => {
                log::trace!("nested marker {line:?} at depth {}", self.depth());
            }
        }
        Ok(())
    }

    /// End of input. Flushes a trailing partial bulk; an unterminated block
    /// is discarded without rendering.
    pub fn shutdown(&mut self) -> Result<()> {
        let buffered = self.buffered();
        if buffered > 0 {
            if self.in_block {
                log::debug!("discarding {buffered} commands from unterminated block");
            } else {
                self.flush()?;
            }
        }
        self.bulk.borrow_mut().clear();
        Ok(())
    }

    /// Current group-size target
    pub fn group_size(&self) -> GroupSize {
        match self.size {
            None => GroupSize::Unset,
            Some(_) if self.in_block => GroupSize::Unbounded,
            Some(size) => GroupSize::Fixed(size.get()),
        }
    }

    /// Number of buffered commands
    pub fn buffered(&self) -> usize {
        self.bulk.borrow().len()
    }

    /// Block nesting depth
    pub fn depth(&self) -> usize {
        self.classifier.depth()
    }

    /// Non-owning view of the bulk in progress
    pub fn view(&self) -> BulkView {
        BulkView::of(&self.bulk)
    }

    fn flush(&mut self) -> Result<()> {
        log::debug!("flushing bulk of {} commands", self.buffered());
        self.notify(|sink| sink.render())?;
        self.bulk.borrow_mut().clear();
        Ok(())
    }

    fn notify(&mut self, mut f: impl FnMut(&mut dyn Sink) -> Result<()>) -> Result<()> {
        let before = self.sinks.len();
        self.sinks.retain(|sink| sink.strong_count() > 0);
        if self.sinks.len() < before {
            log::trace!("pruned {} dead subscriptions", before - self.sinks.len());
        }

        for sink in &self.sinks {
            let Some(sink) = sink.upgrade() else {
                continue;
            };
            f(&mut *sink.borrow_mut())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every rendered bulk
    #[derive(Default)]
    struct Recorder {
        view: BulkView,
        updates: usize,
        rendered: Vec<String>,
    }

    impl Sink for Recorder {
        fn update(&mut self, view: &BulkView) -> Result<()> {
            self.view = view.clone();
            self.updates += 1;
            Ok(())
        }

        fn render(&mut self) -> Result<()> {
            let line = self.view.with(|bulk| bulk.to_string())?;
            self.rendered.push(line);
            Ok(())
        }
    }

    /// Appends its tag to a shared log on every render
    struct Tagged {
        tag: &'static str,
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Sink for Tagged {
        fn update(&mut self, _view: &BulkView) -> Result<()> {
            Ok(())
        }

        fn render(&mut self) -> Result<()> {
            self.log.borrow_mut().push(self.tag);
            Ok(())
        }
    }

    fn coordinator(size: usize) -> (BulkCoordinator, Rc<RefCell<Recorder>>) {
        let mut coordinator = BulkCoordinator::new();
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        coordinator.subscribe(&recorder).unwrap();
        coordinator.configure(size).unwrap();
        (coordinator, recorder)
    }

    fn submit_all(coordinator: &mut BulkCoordinator, lines: &[&str]) {
        for line in lines {
            coordinator.submit(line).unwrap();
        }
    }

    #[test]
    fn test_initial_state() {
        let coordinator = BulkCoordinator::new();
        assert_eq!(coordinator.group_size(), GroupSize::Unset);
        assert_eq!(coordinator.buffered(), 0);
        assert_eq!(coordinator.depth(), 0);
        assert_eq!(coordinator.subscriber_count(), 0);
    }

    #[test]
    fn test_size_trigger_and_trailing_flush() {
        let (mut coordinator, recorder) = coordinator(3);
        submit_all(&mut coordinator, &["cmd1", "cmd2", "cmd3"]);
        assert_eq!(recorder.borrow().rendered, ["bulk: cmd1, cmd2, cmd3"]);

        submit_all(&mut coordinator, &["cmd4", "cmd5"]);
        assert_eq!(coordinator.buffered(), 2);
        coordinator.shutdown().unwrap();
        assert_eq!(
            recorder.borrow().rendered,
            ["bulk: cmd1, cmd2, cmd3", "bulk: cmd4, cmd5"]
        );
    }

    #[test]
    fn test_update_on_every_command() {
        let (mut coordinator, recorder) = coordinator(2);
        // one update on subscribe
        assert_eq!(recorder.borrow().updates, 1);
        submit_all(&mut coordinator, &["a", "{", "b", "}"]);
        assert_eq!(recorder.borrow().updates, 3);
    }

    #[test]
    fn test_block_flushes_pending_bulk() {
        let (mut coordinator, recorder) = coordinator(4);
        submit_all(&mut coordinator, &["cmd1", "cmd2", "cmd3", "{"]);
        assert_eq!(recorder.borrow().rendered, ["bulk: cmd1, cmd2, cmd3"]);
        assert_eq!(coordinator.group_size(), GroupSize::Unbounded);

        submit_all(&mut coordinator, &["cmd4", "cmd5", "cmd6", "cmd7"]);
        coordinator.shutdown().unwrap();
        assert_eq!(recorder.borrow().rendered.len(), 1);
        assert_eq!(coordinator.buffered(), 0);
    }

    #[test]
    fn test_block_ignores_size() {
        let (mut coordinator, recorder) = coordinator(1);
        submit_all(
            &mut coordinator,
            &["{", "cmd1", "cmd2", "{", "cmd3", "cmd4", "}", "cmd5", "cmd6", "}"],
        );
        assert_eq!(
            recorder.borrow().rendered,
            ["bulk: cmd1, cmd2, cmd3, cmd4, cmd5, cmd6"]
        );
        assert_eq!(coordinator.group_size(), GroupSize::Fixed(6));
        assert_eq!(coordinator.depth(), 0);
    }

    #[test]
    fn test_block_length_becomes_group_size() {
        let (mut coordinator, recorder) = coordinator(3);
        submit_all(&mut coordinator, &["{", "a", "b", "}"]);
        assert_eq!(coordinator.group_size(), GroupSize::Fixed(2));

        submit_all(&mut coordinator, &["c", "d", "e"]);
        coordinator.shutdown().unwrap();
        assert_eq!(
            recorder.borrow().rendered,
            ["bulk: a, b", "bulk: c, d", "bulk: e"]
        );
    }

    #[test]
    fn test_nested_open_does_not_reset() {
        let (mut coordinator, recorder) = coordinator(3);
        submit_all(&mut coordinator, &["{", "a", "{"]);
        assert_eq!(coordinator.buffered(), 1);
        assert_eq!(coordinator.depth(), 2);
        assert!(recorder.borrow().rendered.is_empty());
    }

    #[test]
    fn test_empty_block_close() {
        let (mut coordinator, recorder) = coordinator(2);
        coordinator.submit("cmd1").unwrap();
        coordinator.submit("{").unwrap();
        assert!(matches!(
            coordinator.submit("}"),
            Err(BulkError::EmptyBlockClose)
        ));
        assert_eq!(coordinator.group_size(), GroupSize::Fixed(2));

        coordinator.submit("cmd2").unwrap();
        coordinator.shutdown().unwrap();
        assert_eq!(recorder.borrow().rendered, ["bulk: cmd1", "bulk: cmd2"]);
    }

    #[test]
    fn test_not_configured() {
        let mut coordinator = BulkCoordinator::new();
        assert!(matches!(
            coordinator.submit("cmd1"),
            Err(BulkError::NotConfigured)
        ));
        assert_eq!(coordinator.buffered(), 0);
        assert_eq!(coordinator.depth(), 0);
    }

    #[test]
    fn test_reconfigure_below_buffered() {
        let (mut coordinator, _recorder) = coordinator(5);
        submit_all(&mut coordinator, &["cmd1", "cmd2", "cmd3", "cmd4"]);
        assert!(matches!(
            coordinator.configure(3),
            Err(BulkError::InvalidConfiguration {
                requested: 3,
                buffered: 4
            })
        ));
        assert_eq!(coordinator.group_size(), GroupSize::Fixed(5));
    }

    #[test]
    fn test_zero_size_rejected() {
        let mut coordinator = BulkCoordinator::new();
        assert!(matches!(
            coordinator.configure(0),
            Err(BulkError::InvalidConfiguration { .. })
        ));
        assert_eq!(coordinator.group_size(), GroupSize::Unset);
    }

    #[test]
    fn test_reconfigure_to_buffered_flushes() {
        let (mut coordinator, recorder) = coordinator(5);
        submit_all(&mut coordinator, &["a", "b"]);
        coordinator.configure(2).unwrap();
        assert_eq!(recorder.borrow().rendered, ["bulk: a, b"]);
        assert_eq!(coordinator.buffered(), 0);
    }

    #[test]
    fn test_reconfigure_inside_block() {
        let (mut coordinator, recorder) = coordinator(5);
        submit_all(&mut coordinator, &["{", "a", "b"]);
        coordinator.configure(2).unwrap();
        assert_eq!(coordinator.group_size(), GroupSize::Unbounded);
        assert!(recorder.borrow().rendered.is_empty());

        submit_all(&mut coordinator, &["c", "}"]);
        assert_eq!(coordinator.group_size(), GroupSize::Fixed(3));

        submit_all(&mut coordinator, &["d", "e", "f"]);
        assert_eq!(
            recorder.borrow().rendered,
            ["bulk: a, b, c", "bulk: d, e, f"]
        );
    }

    #[test]
    fn test_line_too_long() {
        let (mut coordinator, recorder) = coordinator(2);
        coordinator.submit("cmd1").unwrap();
        let long = "x".repeat(51);
        assert!(matches!(
            coordinator.submit(&long),
            Err(BulkError::LineTooLong { len: 51, max: 50 })
        ));
        assert_eq!(coordinator.buffered(), 1);

        coordinator.submit(&"y".repeat(50)).unwrap();
        let expected = format!("bulk: cmd1, {}", "y".repeat(50));
        assert_eq!(recorder.borrow().rendered, [expected]);
    }

    #[test]
    fn test_line_length_counts_characters() {
        let (mut coordinator, _recorder) = coordinator(10);
        coordinator.submit(&"é".repeat(50)).unwrap();
        assert_eq!(coordinator.buffered(), 1);
    }

    #[test]
    fn test_custom_line_limit() {
        let mut coordinator =
            BulkCoordinator::with_config(CoordinatorConfig::default().max_line_len(3));
        coordinator.configure(1).unwrap();
        assert!(coordinator.submit("abcd").is_err());
        coordinator.submit("abc").unwrap();
    }

    #[test]
    fn test_empty_shutdown_is_silent() {
        let (mut coordinator, recorder) = coordinator(3);
        coordinator.shutdown().unwrap();
        assert!(recorder.borrow().rendered.is_empty());
    }

    #[test]
    fn test_dead_sink_skipped() {
        let (mut coordinator, recorder) = coordinator(1);
        {
            let doomed = Rc::new(RefCell::new(Recorder::default()));
            coordinator.subscribe(&doomed).unwrap();
            assert_eq!(coordinator.subscriber_count(), 2);
        }
        assert_eq!(coordinator.subscriber_count(), 1);
        coordinator.submit("cmd1").unwrap();
        assert_eq!(recorder.borrow().rendered, ["bulk: cmd1"]);
    }

    #[test]
    fn test_notification_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let tagged = |tag| {
            Rc::new(RefCell::new(Tagged {
                tag,
                log: Rc::clone(&log),
            }))
        };

        let mut coordinator = BulkCoordinator::new();
        let first = tagged("first");
        coordinator.subscribe(&first).unwrap();
        {
            let dropped = tagged("dropped");
            coordinator.subscribe(&dropped).unwrap();
        }
        let second = tagged("second");
        coordinator.subscribe(&second).unwrap();
        let third = tagged("third");
        coordinator.subscribe(&third).unwrap();

        coordinator.configure(1).unwrap();
        coordinator.submit("one").unwrap();
        assert_eq!(*log.borrow(), ["first", "second", "third"]);

        coordinator.submit("two").unwrap();
        assert_eq!(
            *log.borrow(),
            ["first", "second", "third", "first", "second", "third"]
        );
    }
}
