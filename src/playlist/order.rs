use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

/// How a freshly loaded list of locations is arranged before it enters the navigator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PlaylistOrder {
    #[default]
    Ascending,
    #[serde(alias = "descendant")]
    Descending,
    Random,
}

impl PlaylistOrder {
    pub fn arrange(&self, paths: &mut [PathBuf]) {
        self.arrange_with(paths, &mut rand::thread_rng());
    }

    pub fn arrange_with<R: Rng + ?Sized>(&self, paths: &mut [PathBuf], rng: &mut R) {
        match self {
            PlaylistOrder::Ascending => paths.sort_by(|a, b| by_display_name(a, b)),
            PlaylistOrder::Descending => paths.sort_by(|a, b| by_display_name(b, a)),
            PlaylistOrder::Random => paths.shuffle(rng),
        }
    }
}

// File name first, full path breaks ties between equal names in different folders
fn by_display_name(a: &Path, b: &Path) -> Ordering {
    a.file_name()
        .cmp(&b.file_name())
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn ascending_sorts_by_file_name() {
        let mut list = paths(&["z/alpha.mp3", "a/gamma.mp3", "m/beta.mp3"]);
        PlaylistOrder::Ascending.arrange(&mut list);
        assert_eq!(list, paths(&["z/alpha.mp3", "m/beta.mp3", "a/gamma.mp3"]));
    }

    #[test]
    fn descending_is_reverse_of_ascending() {
        let mut asc = paths(&["b.mp3", "c.mp3", "a.mp3", "x/a.mp3"]);
        let mut desc = asc.clone();
        PlaylistOrder::Ascending.arrange(&mut asc);
        PlaylistOrder::Descending.arrange(&mut desc);
        asc.reverse();
        assert_eq!(asc, desc);
    }

    #[test]
    fn random_keeps_every_entry() {
        let original = paths(&["a.mp3", "b.mp3", "c.mp3", "d.mp3", "e.mp3"]);
        let mut shuffled = original.clone();
        PlaylistOrder::Random.arrange_with(&mut shuffled, &mut StdRng::seed_from_u64(7));

        shuffled.sort();
        assert_eq!(shuffled, original);
    }

    #[test]
    fn deserializes_legacy_descendant_name() {
        #[derive(Deserialize)]
        struct Wrapper {
            order: PlaylistOrder,
        }

        let parsed: Wrapper = toml::from_str("order = \"descendant\"").unwrap();
        assert_eq!(parsed.order, PlaylistOrder::Descending);
        let parsed: Wrapper = toml::from_str("order = \"random\"").unwrap();
        assert_eq!(parsed.order, PlaylistOrder::Random);
    }
}
