// SPDX-License-Identifier: CEPL-1.0
use tracing::debug;

type Release = Box<dyn FnOnce()>;

/// Release actions in acquisition order. Unwinding runs them newest first,
/// on normal shutdown and when setup bails out halfway.
#[derive(Default)]
pub struct TeardownStack {
    steps: Vec<(&'static str, Release)>,
}

impl TeardownStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, label: &'static str, release: impl FnOnce() + 'static) {
        debug!("acquired {label}");
        self.steps.push((label, Box::new(release)));
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn unwind(&mut self) {
        while let Some((label, release)) = self.steps.pop() {
            debug!("releasing {label}");
            release();
        }
    }
}

impl Drop for TeardownStack {
    fn drop(&mut self) {
        self.unwind();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) -> Box<dyn FnOnce()>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = log.clone();
        let make = move |name: &'static str| {
            let l = l.clone();
            Box::new(move || l.borrow_mut().push(name)) as Box<dyn FnOnce()>
        };
        (log, make)
    }

    #[test]
    fn unwinds_in_reverse() {
        let (log, make) = recorder();
        let mut stack = TeardownStack::new();
        for name in ["instance", "messenger", "surface", "device", "swapchain"] {
            stack.push(name, make(name));
        }
        assert_eq!(stack.len(), 5);
        stack.unwind();
        assert!(stack.is_empty());
        assert_eq!(
            *log.borrow(),
            vec!["swapchain", "device", "surface", "messenger", "instance"]
        );
    }

    #[test]
    fn drop_releases_partial_setup() {
        let (log, make) = recorder();
        let setup = |device_ok: bool| -> Result<TeardownStack, &'static str> {
            let mut stack = TeardownStack::new();
            stack.push("instance", make("instance"));
            stack.push("surface", make("surface"));
            if !device_ok {
                return Err("failed to create logical device");
            }
            stack.push("device", make("device"));
            Ok(stack)
        };
        assert!(setup(false).is_err());
        assert_eq!(*log.borrow(), vec!["surface", "instance"]);
    }

    #[test]
    fn unwinding_twice_is_harmless() {
        let (log, make) = recorder();
        let mut stack = TeardownStack::new();
        stack.push("instance", make("instance"));
        stack.unwind();
        drop(stack);
        assert_eq!(*log.borrow(), vec!["instance"]);
    }
}
