/// Album paths chosen for the next bulk operation, kept in the order they
/// were picked. Paths are not checked against any catalog; the ones that no
/// longer resolve are simply ignored by the consumers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    paths: Vec<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.iter().any(|selected| selected == path)
    }

    /// Returns a copy with `path` flipped in or out.
    pub fn toggled(&self, path: &str) -> Selection {
        let mut next = self.clone();
        next.toggle(path);
        next
    }

    /// Flips `path` in place; returns whether it is now selected.
    pub fn toggle(&mut self, path: &str) -> bool {
        if let Some(index) = self.paths.iter().position(|selected| selected == path) {
            self.paths.remove(index);
            false
        } else {
            self.paths.push(path.to_string());
            true
        }
    }

    pub fn clear(&mut self) {
        self.paths.clear();
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for Selection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut selection = Selection::new();
        for path in iter {
            let path = path.into();
            if !selection.contains(&path) {
                selection.paths.push(path);
            }
        }
        selection
    }
}
