use super::event::Key;

/// Rows moved by PageUp / PageDown.
pub const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Namespaces,
    Apps,
    Env,
}

impl Pane {
    pub const ALL: [Pane; 3] = [Pane::Namespaces, Pane::Apps, Pane::Env];

    pub fn title(&self) -> &'static str {
        match self {
            Pane::Namespaces => "Namespaces",
            Pane::Apps => "Apps",
            Pane::Env => "Env",
        }
    }

    fn index(&self) -> usize {
        match self {
            Pane::Namespaces => 0,
            Pane::Apps => 1,
            Pane::Env => 2,
        }
    }

    /// Tab order, wrapping.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// One pane to the right, stopping at the last.
    pub fn right(self) -> Self {
        Self::ALL[(self.index() + 1).min(Self::ALL.len() - 1)]
    }

    pub fn left(self) -> Self {
        Self::ALL[self.index().saturating_sub(1)]
    }
}

/// Something with a cursor that can be moved one row or one page at a time.
pub trait Scrollable {
    fn scroll_down(&mut self);
    fn scroll_up(&mut self);
    fn scroll_page_down(&mut self);
    fn scroll_page_up(&mut self);
}

/// Applies a navigation key to `state`.
///
/// Returns `true` if the key was handled.
pub fn handle_scroll_key<S: Scrollable>(state: &mut S, key: Key) -> bool {
    match key {
        Key::Down | Key::Char('j') | Key::Ctrl('n') => state.scroll_down(),
        Key::Up | Key::Char('k') | Key::Ctrl('p') => state.scroll_up(),
        Key::PageDown => state.scroll_page_down(),
        Key::PageUp => state.scroll_page_up(),
        _ => return false,
    }
    true
}

/// Moves `pos` by `delta` inside `0..len`.
pub fn clamp_move(pos: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    pos.saturating_add_signed(delta).min(len - 1)
}

/// Items of one pane with a transient cursor and an optional committed selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneList<T> {
    items: Vec<T>,
    cursor: usize,
    selected: Option<usize>,
}

impl<T> Default for PaneList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            cursor: 0,
            selected: None,
        }
    }
}

impl<T> PaneList<T> {
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Item under the cursor.
    pub fn current(&self) -> Option<&T> {
        self.items.get(self.cursor)
    }

    pub fn selected_item(&self) -> Option<&T> {
        self.selected.and_then(|idx| self.items.get(idx))
    }

    /// Replaces the items, resetting cursor and selection.
    pub fn replace(&mut self, items: Vec<T>) {
        self.items = items;
        self.cursor = 0;
        self.selected = None;
    }

    pub fn reset(&mut self) {
        self.replace(Vec::new());
    }

    pub fn set_cursor(&mut self, idx: usize) {
        self.cursor = clamp_move(idx, 0, self.items.len());
    }

    /// Commits the cursor row. Returns the committed item.
    pub fn commit(&mut self) -> Option<&T> {
        if self.items.is_empty() {
            return None;
        }
        self.selected = Some(self.cursor);
        self.items.get(self.cursor)
    }

    fn move_by(&mut self, delta: isize) {
        self.cursor = clamp_move(self.cursor, delta, self.items.len());
    }
}

impl<T: PartialEq> PaneList<T> {
    /// Replaces the items, keeping the selection when the selected item survives.
    pub fn replace_keeping_selection(&mut self, items: Vec<T>) {
        let keep = self
            .selected_item()
            .and_then(|prev| items.iter().position(|item| item == prev));
        self.replace(items);
        if let Some(idx) = keep {
            self.cursor = idx;
            self.selected = Some(idx);
        }
    }
}

impl<T> Scrollable for PaneList<T> {
    fn scroll_down(&mut self) {
        self.move_by(1);
    }

    fn scroll_up(&mut self) {
        self.move_by(-1);
    }

    fn scroll_page_down(&mut self) {
        self.move_by(PAGE_SIZE as isize);
    }

    fn scroll_page_up(&mut self) {
        self.move_by(-(PAGE_SIZE as isize));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(n: usize) -> PaneList<String> {
        let mut pane = PaneList::default();
        pane.replace((0..n).map(|i| format!("item-{i}")).collect());
        pane
    }

    #[test]
    fn test_focus_cycles() {
        assert_eq!(Pane::Namespaces.next(), Pane::Apps);
        assert_eq!(Pane::Env.next(), Pane::Namespaces);
        assert_eq!(Pane::Namespaces.prev(), Pane::Env);
        assert_eq!(Pane::Env.right(), Pane::Env);
        assert_eq!(Pane::Namespaces.left(), Pane::Namespaces);
        assert_eq!(Pane::Apps.left(), Pane::Namespaces);
    }

    #[test]
    fn test_cursor_is_clamped() {
        let mut pane = list(3);
        assert!(handle_scroll_key(&mut pane, Key::Up));
        assert_eq!(pane.cursor(), 0);
        handle_scroll_key(&mut pane, Key::PageDown);
        assert_eq!(pane.cursor(), 2);
        handle_scroll_key(&mut pane, Key::Char('k'));
        assert_eq!(pane.cursor(), 1);
        assert!(!handle_scroll_key(&mut pane, Key::Enter));
    }

    #[test]
    fn test_empty_pane_navigation() {
        let mut pane = list(0);
        handle_scroll_key(&mut pane, Key::Down);
        assert_eq!(pane.cursor(), 0);
        assert!(pane.current().is_none());
        assert!(pane.commit().is_none());
        assert!(pane.selected().is_none());
    }

    #[test]
    fn test_commit_and_replace() {
        let mut pane = list(3);
        pane.set_cursor(2);
        assert_eq!(pane.commit().map(String::as_str), Some("item-2"));
        assert_eq!(pane.selected(), Some(2));

        pane.replace_keeping_selection(vec!["item-2".into(), "other".into()]);
        assert_eq!(pane.selected(), Some(0));

        pane.replace_keeping_selection(vec!["other".into()]);
        assert_eq!(pane.selected(), None);
        assert_eq!(pane.cursor(), 0);
    }
}
