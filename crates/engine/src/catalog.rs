use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

use common::AlbumRecord;

use crate::selection::Selection;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Artist,
    Album,
    /// Folder name; no timestamp is tracked for albums.
    Date,
}

impl SortKey {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "artist" => Some(Self::Artist),
            "album" => Some(Self::Album),
            "date" | "added" => Some(Self::Date),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Asc),
            "desc" | "descending" => Some(Self::Desc),
            _ => None,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewOptions {
    pub search: String,
    pub sort_key: SortKey,
    pub sort_dir: SortDir,
    pub mp3_only: bool,
    pub synced_only: bool,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            search: String::new(),
            sort_key: SortKey::Artist,
            sort_dir: SortDir::Asc,
            mp3_only: true,
            synced_only: false,
        }
    }
}

/// Filters then sorts a copy of the catalog. Filters apply in the order
/// mp3-only, search, synced-only.
pub fn view(catalog: &[AlbumRecord], options: &ViewOptions) -> Vec<AlbumRecord> {
    let term = options.search.trim().to_lowercase();

    let mut albums: Vec<AlbumRecord> = catalog
        .iter()
        .filter(|album| !options.mp3_only || album.track_count > 0)
        .filter(|album| term.is_empty() || matches_search(album, &term))
        .filter(|album| !options.synced_only || album.is_synced)
        .cloned()
        .collect();

    albums.sort_by(|a, b| {
        let ordering = compare(options.sort_key, a, b);
        match options.sort_dir {
            SortDir::Asc => ordering,
            SortDir::Desc => ordering.reverse(),
        }
    });
    albums
}

fn matches_search(album: &AlbumRecord, term: &str) -> bool {
    album.artist.to_lowercase().contains(term)
        || album.album.to_lowercase().contains(term)
        || album.name.to_lowercase().contains(term)
}

fn compare(key: SortKey, a: &AlbumRecord, b: &AlbumRecord) -> Ordering {
    match key {
        SortKey::Artist => {
            locale_cmp(&a.artist, &b.artist).then_with(|| locale_cmp(&a.album, &b.album))
        }
        SortKey::Album => locale_cmp(&a.album, &b.album),
        SortKey::Date => locale_cmp(&a.name, &b.name),
    }
}

/// Case-insensitive ordering; exact case only breaks ties.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| a.cmp(b))
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SelectionStats {
    pub count: usize,
    pub total_size_mb: f64,
    pub total_size_gb: f64,
}

impl fmt::Display for SelectionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total_size_gb >= 1.0 {
            write!(f, "{} albums, {:.2} GB", self.count, self.total_size_gb)
        } else {
            write!(f, "{} albums, {:.0} MB", self.count, self.total_size_mb)
        }
    }
}

/// Count and size of the selected albums present in `catalog`.
pub fn stats(catalog: &[AlbumRecord], selection: &Selection) -> SelectionStats {
    let selected: HashSet<&str> = selection.iter().collect();
    let mut stats = SelectionStats::default();
    for album in catalog.iter().filter(|album| selected.contains(album.path.as_str())) {
        stats.count += 1;
        stats.total_size_mb += album.size_mb;
    }
    stats.total_size_gb = stats.total_size_mb / 1024.0;
    stats
}

/// Whether running the selection would remove anything from the target.
pub fn needs_unsync(catalog: &[AlbumRecord], selection: &Selection) -> bool {
    catalog
        .iter()
        .any(|album| album.is_synced && selection.contains(&album.path))
}

#[cfg(test)]
pub(crate) fn album(path: &str, artist: &str, title: &str, tracks: u32, size_mb: f64) -> AlbumRecord {
    AlbumRecord {
        path: path.to_string(),
        name: title.to_string(),
        artist: artist.to_string(),
        album: title.to_string(),
        track_count: tracks,
        has_cover: false,
        size_mb,
        is_synced: false,
        fingerprint: format!("fp:{}", path),
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use super::{album, locale_cmp, needs_unsync, stats, view, SortDir, SortKey, ViewOptions};
    use crate::selection::Selection;
    use common::AlbumRecord;

    fn all() -> ViewOptions {
        ViewOptions {
            mp3_only: false,
            ..ViewOptions::default()
        }
    }

    fn paths(albums: &[AlbumRecord]) -> Vec<&str> {
        albums.iter().map(|album| album.path.as_str()).collect()
    }

    fn fixture() -> Vec<AlbumRecord> {
        let mut revolver = album("/b", "Beatles", "Revolver", 14, 95.0);
        revolver.is_synced = true;
        let mut kid_a = album("/c", "radiohead", "Kid A", 10, 80.0);
        kid_a.name = "2000 Kid A".to_string();
        let flac_only = album("/d", "Nick Drake", "Pink Moon", 0, 200.0);
        vec![
            kid_a,
            album("/a", "Beatles", "Abbey Road", 17, 120.0),
            flac_only,
            revolver,
        ]
    }

    #[test]
    fn artist_sort_breaks_ties_by_album() {
        let catalog = vec![
            {
                let mut b = album("/b", "Beatles", "Revolver", 14, 95.0);
                b.is_synced = true;
                b
            },
            album("/a", "Beatles", "Abbey Road", 17, 120.0),
        ];
        let options = ViewOptions {
            sort_key: SortKey::Artist,
            sort_dir: SortDir::Asc,
            ..all()
        };
        assert_eq!(paths(&view(&catalog, &options)), vec!["/a", "/b"]);
    }

    #[test]
    fn mp3_only_drops_albums_without_mp3() {
        let albums = view(&fixture(), &ViewOptions::default());
        assert!(albums.iter().all(|album| album.track_count > 0));
        assert_eq!(albums.len(), 3);
        assert_eq!(view(&fixture(), &all()).len(), 4);
    }

    #[test]
    fn search_matches_artist_album_or_name() {
        for term in ["BEAT", "moon", "2000", "  kid "] {
            let options = ViewOptions {
                search: term.to_string(),
                ..all()
            };
            let albums = view(&fixture(), &options);
            assert!(!albums.is_empty(), "no match for {:?}", term);
            let needle = term.trim().to_lowercase();
            for album in &albums {
                assert!(
                    album.artist.to_lowercase().contains(&needle)
                        || album.album.to_lowercase().contains(&needle)
                        || album.name.to_lowercase().contains(&needle)
                );
            }
        }
        let blank = ViewOptions {
            search: "   ".to_string(),
            ..all()
        };
        assert_eq!(view(&fixture(), &blank).len(), 4);
    }

    #[test]
    fn filters_compose() {
        let options = ViewOptions {
            search: "beatles".to_string(),
            synced_only: true,
            ..ViewOptions::default()
        };
        assert_eq!(paths(&view(&fixture(), &options)), vec!["/b"]);
    }

    #[test]
    fn descending_is_reverse_of_ascending() {
        for key in [SortKey::Artist, SortKey::Album, SortKey::Date] {
            let asc = view(
                &fixture(),
                &ViewOptions {
                    sort_key: key,
                    ..all()
                },
            );
            let mut desc = view(
                &fixture(),
                &ViewOptions {
                    sort_key: key,
                    sort_dir: SortDir::Desc,
                    ..all()
                },
            );
            desc.reverse();
            assert_eq!(paths(&asc), paths(&desc), "key {:?}", key);
        }
    }

    #[test]
    fn sort_keys_order_as_expected() {
        let by_artist = view(&fixture(), &all());
        assert_eq!(paths(&by_artist), vec!["/a", "/b", "/d", "/c"]);
        let by_album = view(
            &fixture(),
            &ViewOptions {
                sort_key: SortKey::Album,
                ..all()
            },
        );
        assert_eq!(paths(&by_album), vec!["/a", "/c", "/d", "/b"]);
        let by_date = view(
            &fixture(),
            &ViewOptions {
                sort_key: SortKey::Date,
                ..all()
            },
        );
        assert_eq!(paths(&by_date), vec!["/c", "/a", "/d", "/b"]);
    }

    #[test]
    fn view_leaves_catalog_untouched() {
        let catalog = fixture();
        let before = catalog.clone();
        let _ = view(&catalog, &all());
        assert_eq!(catalog, before);
    }

    #[test]
    fn locale_cmp_ignores_case_first() {
        assert_eq!(locale_cmp("abba", "Beatles"), Ordering::Less);
        assert_eq!(locale_cmp("Zappa", "abba"), Ordering::Greater);
        assert_eq!(locale_cmp("same", "same"), Ordering::Equal);
        assert_ne!(locale_cmp("Same", "same"), Ordering::Equal);
    }

    #[test]
    fn stats_sum_selected_sizes() {
        let selection: Selection = ["/a", "/b"].into_iter().collect();
        let stats = stats(&fixture(), &selection);
        assert_eq!(stats.count, 2);
        assert_eq!(stats.total_size_mb, 215.0);
        assert_eq!(stats.total_size_gb, 215.0 / 1024.0);
        assert_eq!(stats.to_string(), "2 albums, 215 MB");
    }

    #[test]
    fn stats_zero_for_empty_and_orphaned_selection() {
        let empty = stats(&fixture(), &Selection::new());
        assert_eq!(empty.count, 0);
        assert_eq!(empty.total_size_mb, 0.0);
        let orphans: Selection = ["/gone", "/missing"].into_iter().collect();
        let orphaned = stats(&fixture(), &orphans);
        assert_eq!(orphaned.count, 0);
        assert_eq!(orphaned.total_size_gb, 0.0);
    }

    #[test]
    fn stats_display_switches_to_gigabytes() {
        let catalog = vec![album("/big", "X", "Box Set", 90, 2048.0)];
        let selection: Selection = ["/big"].into_iter().collect();
        assert_eq!(stats(&catalog, &selection).to_string(), "1 albums, 2.00 GB");
    }

    #[test]
    fn needs_unsync_only_for_synced_selection() {
        let catalog = fixture();
        let adds: Selection = ["/a", "/c"].into_iter().collect();
        assert!(!needs_unsync(&catalog, &adds));
        assert!(needs_unsync(&catalog, &adds.toggled("/b")));
    }

    #[test]
    fn parses_cli_values() {
        assert_eq!(SortKey::parse("Album"), Some(SortKey::Album));
        assert_eq!(SortKey::parse("date"), Some(SortKey::Date));
        assert_eq!(SortKey::parse("year"), None);
        assert_eq!(SortDir::parse("DESC"), Some(SortDir::Desc));
        assert_eq!(SortDir::Asc.flipped(), SortDir::Desc);
    }
}
