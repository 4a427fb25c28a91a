use crate::screens::Screen;

/// Screens visited from the root. Empty means the root status screen,
/// which the dispatcher owns separately.
#[derive(Default)]
pub struct NavStack {
    screens: Vec<Box<dyn Screen>>,
}

impl NavStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, screen: Box<dyn Screen>) {
        self.screens.push(screen);
    }

    /// Pop the top screen. Popping at the root does nothing.
    pub fn pop(&mut self) -> Option<Box<dyn Screen>> {
        self.screens.pop()
    }

    /// Back to the root.
    pub fn reset(&mut self) {
        self.screens.clear();
    }

    pub fn top_mut(&mut self) -> Option<&mut (dyn Screen + 'static)> {
        self.screens.last_mut().map(|s| s.as_mut())
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    /// Check the top screen once and pop it if it has expired. Screens
    /// underneath are not checked until they are on top, so each spends at
    /// most one tick of budget per refresh.
    pub fn drop_invalid(&mut self) -> bool {
        match self.screens.last_mut().map(|top| top.valid()) {
            Some(false) => {
                self.screens.pop();
                true
            }
            _ => false,
        }
    }
}
