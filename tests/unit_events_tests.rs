//! # Event Bus Unit Tests / 事件总线单元测试
//!
//! Delivery order, late subscription, error propagation and the typed
//! subscription helpers of `EventBus`.
//!
//! 测试 `EventBus` 的投递顺序、延迟订阅、错误传播以及类型化订阅辅助方法。

use std::cell::RefCell;
use std::rc::Rc;

use peridot::core::events::{Event, EventBus, EventKind};
use peridot::error::Error;

#[cfg(test)]
mod delivery_tests {
    use super::*;

    #[test]
    fn test_listeners_run_in_registration_order() {
        let bus = EventBus::new();
        let calls = Rc::new(RefCell::new(Vec::new()));

        for id in 1..=3 {
            let calls = calls.clone();
            bus.on(EventKind::RunnerStart, move |_| {
                calls.borrow_mut().push(id);
                Ok(())
            });
        }

        bus.emit(&mut Event::RunnerStart).unwrap();
        assert_eq!(*calls.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn test_reemitting_invokes_every_listener_again() {
        let bus = EventBus::new();
        let count = Rc::new(RefCell::new(0));
        let counter = count.clone();
        bus.on(EventKind::RunnerStart, move |_| {
            *counter.borrow_mut() += 1;
            Ok(())
        });

        bus.emit(&mut Event::RunnerStart).unwrap();
        bus.emit(&mut Event::RunnerStart).unwrap();
        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn test_listener_added_during_emit_runs_on_next_emit() {
        let bus = EventBus::new();
        let late_calls = Rc::new(RefCell::new(0));

        let inner_bus = bus.clone();
        let late = late_calls.clone();
        bus.on(EventKind::RunnerStart, move |_| {
            let late = late.clone();
            inner_bus.on(EventKind::RunnerStart, move |_| {
                *late.borrow_mut() += 1;
                Ok(())
            });
            Ok(())
        });

        bus.emit(&mut Event::RunnerStart).unwrap();
        assert_eq!(*late_calls.borrow(), 0);

        bus.emit(&mut Event::RunnerStart).unwrap();
        assert_eq!(*late_calls.borrow(), 1);
    }

    #[test]
    fn test_events_of_other_kinds_are_not_delivered() {
        let bus = EventBus::new();
        let called = Rc::new(RefCell::new(false));
        let flag = called.clone();
        bus.on(EventKind::RunnerEnd, move |_| {
            *flag.borrow_mut() = true;
            Ok(())
        });

        bus.emit(&mut Event::RunnerStart).unwrap();
        assert!(!*called.borrow());
        assert_eq!(bus.listener_count(EventKind::RunnerEnd), 1);
        assert_eq!(bus.listener_count(EventKind::RunnerStart), 0);
    }
}

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn test_first_listener_error_stops_emission() {
        let bus = EventBus::new();
        let reached = Rc::new(RefCell::new(false));

        bus.on(EventKind::RunnerStart, |_| anyhow::bail!("listener exploded"));
        let flag = reached.clone();
        bus.on(EventKind::RunnerStart, move |_| {
            *flag.borrow_mut() = true;
            Ok(())
        });

        let err = bus.emit(&mut Event::RunnerStart).unwrap_err();
        match err {
            Error::Listener { event, source } => {
                assert_eq!(event, "runner.start");
                assert!(source.to_string().contains("listener exploded"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!*reached.borrow());
    }
}

#[cfg(test)]
mod kind_tests {
    use super::*;

    #[test]
    fn test_lifecycle_names_follow_firing_order() {
        let names: Vec<&str> = EventKind::LIFECYCLE.iter().map(EventKind::name).collect();
        assert_eq!(
            names,
            vec![
                "peridot.start",
                "peridot.execute",
                "peridot.reporters",
                "peridot.load",
                "peridot.end"
            ]
        );
    }

    #[test]
    fn test_event_reports_its_kind() {
        assert_eq!(Event::RunnerStart.kind(), EventKind::RunnerStart);
        assert_eq!(EventKind::SuiteStart.to_string(), "suite.start");
    }
}
