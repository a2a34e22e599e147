#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    Input,
    Dropdown,
    Outside,
}

/// Outside-interaction listener. Armed only while the dropdown is open.
#[derive(Debug, Default)]
pub struct DismissalWatcher {
    armed: bool,
}

impl DismissalWatcher {
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn arm(&mut self) {
        if !self.armed {
            tracing::trace!("dismissal watcher armed");
        }
        self.armed = true;
    }

    pub fn disarm(&mut self) {
        if self.armed {
            tracing::trace!("dismissal watcher disarmed");
        }
        self.armed = false;
    }

    pub fn observe(&self, target: PointerTarget) -> bool {
        self.armed && target == PointerTarget::Outside
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_outside_pointer_dismisses_while_armed() {
        let mut watcher = DismissalWatcher::default();
        assert!(!watcher.observe(PointerTarget::Outside));

        watcher.arm();
        assert!(watcher.observe(PointerTarget::Outside));
        assert!(!watcher.observe(PointerTarget::Input));
        assert!(!watcher.observe(PointerTarget::Dropdown));

        watcher.disarm();
        assert!(!watcher.observe(PointerTarget::Outside));
    }
}
