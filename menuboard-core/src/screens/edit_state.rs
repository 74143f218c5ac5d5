//! The Viewing/Editing cycle shared by every editable item.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Viewing,
    Editing,
}

/// Saved value plus a working draft.
///
/// Editors for existing items start in [`Mode::Viewing`]; saving or cancelling
/// returns there. Editors for new items start in [`Mode::Editing`] and stay
/// there: a successful add resets the draft to blank for the next entry.
#[derive(Debug, Clone)]
pub struct Editor<T> {
    saved: T,
    draft: T,
    mode: Mode,
    new_item: bool,
    busy: bool,
}

impl<T: Clone> Editor<T> {
    pub fn existing(saved: T) -> Self {
        Self {
            draft: saved.clone(),
            saved,
            mode: Mode::Viewing,
            new_item: false,
            busy: false,
        }
    }

    pub fn new_item(blank: T) -> Self {
        Self {
            draft: blank.clone(),
            saved: blank,
            mode: Mode::Editing,
            new_item: true,
            busy: false,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        self.mode == Mode::Editing
    }

    pub fn is_new_item(&self) -> bool {
        self.new_item
    }

    pub fn saved(&self) -> &T {
        &self.saved
    }

    pub fn draft(&self) -> &T {
        &self.draft
    }

    /// Writable fields, only while editing.
    pub fn draft_mut(&mut self) -> Option<&mut T> {
        match self.mode {
            Mode::Editing => Some(&mut self.draft),
            Mode::Viewing => None,
        }
    }

    pub fn begin_edit(&mut self) {
        self.draft = self.saved.clone();
        self.mode = Mode::Editing;
    }

    /// Throws the draft away.
    pub fn cancel(&mut self) {
        self.draft = self.saved.clone();
        if !self.new_item {
            self.mode = Mode::Viewing;
        }
    }

    /// Records a successful save. New-item editors go back to blank.
    pub fn commit(&mut self) {
        if self.new_item {
            self.reset();
        } else {
            self.saved = self.draft.clone();
            self.mode = Mode::Viewing;
        }
    }

    /// Replaces the saved value, e.g. after the backend returned its copy.
    pub fn commit_with(&mut self, saved: T) {
        if self.new_item {
            self.reset();
        } else {
            self.draft = saved.clone();
            self.saved = saved;
            self.mode = Mode::Viewing;
        }
    }

    pub fn reset(&mut self) {
        self.draft = self.saved.clone();
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }
}
