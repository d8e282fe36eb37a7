use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, LockResult, Mutex, MutexGuard},
};

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, error, warn};

use crate::{
    content::Entry,
    fs::{self, path_has_extensions, MARKDOWN_EXTENSIONS},
};

use super::{read_entry, ReadFromPathError};

// Let's keep the possible events simpler for our needs
#[derive(Debug, PartialEq)]
enum FsEvent {
    Rename,
    Edit,
    Create,
    Delete,
    Ignored,
    Unhandled(notify::EventKind),
}

impl From<notify::EventKind> for FsEvent {
    fn from(event_kind: notify::EventKind) -> Self {
        use notify::event::{
            AccessKind, AccessMode, CreateKind, DataChange, EventKind, ModifyKind, RemoveKind,
            RenameMode,
        };
        match event_kind {
            EventKind::Modify(ModifyKind::Name(RenameMode::Any)) => Self::Rename,
            EventKind::Modify(ModifyKind::Name(RenameMode::From)) => Self::Delete,
            EventKind::Modify(ModifyKind::Name(RenameMode::To)) => Self::Create,
            EventKind::Modify(ModifyKind::Data(DataChange::Content | DataChange::Any)) => {
                Self::Edit
            }
            EventKind::Remove(RemoveKind::File) => Self::Delete,
            EventKind::Create(CreateKind::File) => Self::Create,
            EventKind::Access(AccessKind::Close(AccessMode::Write)) => Self::Ignored,
            unhandled => Self::Unhandled(unhandled),
        }
    }
}

/// The in-memory copy of one collection directory.
///
/// Entries are keyed by path, so iteration order is the file name order.
#[derive(Debug)]
pub struct Keeper<E> {
    pub dir: Utf8PathBuf,
    pub inner: BTreeMap<Utf8PathBuf, E>,
}

#[derive(Debug, thiserror::Error)]
pub enum NewKeeperError {
    #[error("IO error reading {dir}: {source}")]
    Io {
        dir: Utf8PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to load content file: {0}")]
    ReadFrontmatterFromPath(#[from] ReadFromPathError),
    #[error("Both {first} and {second} have the slug {slug:?}")]
    DuplicateSlug {
        slug: String,
        first: Utf8PathBuf,
        second: Utf8PathBuf,
    },
}

impl<E: Entry> Keeper<E> {
    pub fn new(dir: &Utf8Path) -> Result<Self, NewKeeperError> {
        let markdown_fps = fs::filepaths_with_extensions(dir, &MARKDOWN_EXTENSIONS)
            .map_err(|source| NewKeeperError::Io {
                dir: dir.to_owned(),
                source,
            })?
            .into_iter()
            .map(|path| -> Result<_, ReadFromPathError> {
                let entry: E = read_entry(&path)?;

                Ok((path, entry))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        let mut slugs: HashMap<&str, &Utf8Path> = HashMap::new();
        for (path, entry) in &markdown_fps {
            if let Some(first) = slugs.insert(entry.slug(), path) {
                return Err(NewKeeperError::DuplicateSlug {
                    slug: entry.slug().to_owned(),
                    first: first.to_owned(),
                    second: path.clone(),
                });
            }
        }

        debug!(
            "Loaded {} {} entries from {dir}",
            markdown_fps.len(),
            E::SCHEMA.collection
        );

        Ok(Keeper {
            dir: dir.to_owned(),
            inner: markdown_fps,
        })
    }

    #[must_use]
    pub fn entries(&self) -> Vec<&E> {
        self.inner.values().collect()
    }

    #[must_use]
    pub fn get(&self, slug: &str) -> Option<&E> {
        self.inner.values().find(|entry| entry.slug() == slug)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl<E: Entry> Keeper<E> {
    /// Path of another file already holding `slug`.
    fn slug_holder(&self, slug: &str, path: &Utf8Path) -> Option<&Utf8Path> {
        self.inner
            .iter()
            .find(|(other, entry)| other.as_path() != path && entry.slug() == slug)
            .map(|(other, _)| other.as_path())
    }

    fn insert_unique(&mut self, path: &Utf8Path, entry: E, event: &str) {
        if let Some(holder) = self.slug_holder(entry.slug(), path) {
            warn!(
                "Skipping ({path}) after {event} event: slug {:?} already belongs to ({holder})",
                entry.slug()
            );
            return;
        }
        self.inner.insert(path.to_owned(), entry);
    }

    fn process_rename_event(&mut self, path: &Utf8Path) {
        let was_removed = self.inner.remove(path).is_some();
        if !was_removed {
            let entry = match read_entry(path) {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("Couldn't load file ({path}) after Rename event: {err}");
                    return;
                }
            };
            self.insert_unique(path, entry, "Rename");
        }
    }

    fn process_edit_event(&mut self, path: &Utf8Path) {
        let new_entry = match read_entry(path) {
            Ok(new_entry) => new_entry,
            Err(err) => {
                warn!("Couldn't load file ({path}) after Edit event: {err}");
                return;
            }
        };
        self.insert_unique(path, new_entry, "Edit");
    }

    fn process_removal_event(&mut self, path: &Utf8Path) {
        let was_removed = self.inner.remove(path).is_some();
        if !was_removed {
            warn!("Couldn't find ({path}) in Remove event.");
        }
    }

    fn process_create_event(&mut self, path: &Utf8Path) {
        if self.inner.contains_key(path) {
            warn!("A Create event occurred for a path ({path}) but it already exists in memory.");
            return;
        }
        let new_entry = match read_entry(path) {
            Ok(new_entry) => new_entry,
            Err(err) => {
                warn!("Couldn't load file ({path}) during Create event: {err}");
                return;
            }
        };
        self.insert_unique(path, new_entry, "Create");
    }
}

pub struct ArcMutex<E>(pub Arc<Mutex<Keeper<E>>>);

impl<E> Clone for ArcMutex<E> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<E> ArcMutex<E> {
    pub fn new(keeper: Keeper<E>) -> Self {
        Self(Arc::new(Mutex::new(keeper)))
    }

    pub fn lock(&self) -> LockResult<MutexGuard<'_, Keeper<E>>> {
        self.0.as_ref().lock()
    }
}

impl<E: Entry> notify::EventHandler for ArcMutex<E> {
    fn handle_event(&mut self, event: notify::Result<notify::Event>) {
        match event {
            Ok(notify::Event {
                kind,
                paths,
                attrs: _,
            }) => {
                let Some(path) = paths.first() else {
                    warn!("Watch event ({kind:?}) carried no path");
                    return;
                };
                let path = match Utf8PathBuf::try_from(path.clone()) {
                    Ok(path) => path,
                    Err(err) => {
                        warn!("Event filepath ({path:?}) was not UTF-8: {err}. Non-UTF-8 paths not supported.");
                        return;
                    }
                };
                if !path_has_extensions(&path, &MARKDOWN_EXTENSIONS) {
                    return;
                }
                let mut keeper = match self.lock() {
                    Ok(keeper) => keeper,
                    Err(err) => {
                        error!("Failed to lock {} during notify event: {err}", E::SCHEMA.collection);
                        return;
                    }
                };
                match FsEvent::from(kind) {
                    FsEvent::Rename => keeper.process_rename_event(&path),
                    FsEvent::Edit => keeper.process_edit_event(&path),
                    FsEvent::Delete => keeper.process_removal_event(&path),
                    FsEvent::Create => keeper.process_create_event(&path),
                    FsEvent::Ignored => (),
                    FsEvent::Unhandled(event) => debug!("unhandled watch event: {event:?}"),
                }
            }
            Err(err) => error!("watch error: {err:?}"),
        }
    }
}

#[cfg(test)]
mod test {
    use std::io::Write;

    use camino::{Utf8Path, Utf8PathBuf};
    use notify::{
        event::{CreateKind, ModifyKind, RemoveKind, RenameMode},
        EventHandler, EventKind,
    };
    use pretty_assertions::assert_eq;

    use super::{ArcMutex, FsEvent, Keeper, NewKeeperError};
    use crate::content::{BlogPost, Entry};

    struct TestDir {
        path: Utf8PathBuf,
    }

    impl TestDir {
        fn new(name: &str) -> Self {
            let dir = Utf8PathBuf::try_from(std::env::temp_dir())
                .unwrap()
                .join(format!("folio-keeper-{name}-{}", std::process::id()));
            if dir.exists() {
                std::fs::remove_dir_all(&dir).unwrap();
            }
            std::fs::create_dir_all(&dir).unwrap();
            TestDir { path: dir }
        }

        fn write(&self, name: &str, contents: &str) -> Utf8PathBuf {
            let path = self.path.join(name);
            let mut file = std::fs::File::create(&path).unwrap();
            write!(file, "{contents}").unwrap();
            path
        }
    }

    impl Drop for TestDir {
        fn drop(&mut self) {
            if self.path.exists() {
                std::fs::remove_dir_all(&self.path).unwrap();
            }
        }
    }

    fn post(title: &str, date: &str) -> String {
        format!("---\ntitle: {title}\nsummary: About {title}\ndate: {date}\ntags: [rust]\n---\nBody of {title}\n")
    }

    fn event(kind: EventKind, path: &Utf8Path) -> notify::Result<notify::Event> {
        Ok(notify::Event::new(kind).add_path(path.as_std_path().to_path_buf()))
    }

    fn slugs(keeper: &ArcMutex<BlogPost>) -> Vec<String> {
        keeper
            .lock()
            .unwrap()
            .entries()
            .iter()
            .map(|e| e.slug().to_owned())
            .collect()
    }

    #[test]
    fn loads_markdown_in_name_order() {
        let dir = TestDir::new("load");
        dir.write("b-second.mdx", &post("Second", "2024-02-01"));
        dir.write("a-first.md", &post("First", "2024-01-01"));
        dir.write("notes.txt", "not content");

        let keeper = Keeper::<BlogPost>::new(&dir.path).unwrap();

        assert_eq!(2, keeper.len());
        assert_eq!(
            vec!["a-first", "b-second"],
            keeper.entries().iter().map(|e| e.slug()).collect::<Vec<_>>()
        );
        assert_eq!("Second", keeper.get("b-second").unwrap().title);
        assert!(keeper.get("notes").is_none());
    }

    #[test]
    fn invalid_file_fails_loading() {
        let dir = TestDir::new("invalid");
        dir.write("ok.md", &post("Ok", "2024-01-01"));
        dir.write("bad.md", "---\ntitle: Bad\n---\n");

        assert!(Keeper::<BlogPost>::new(&dir.path).is_err());
    }

    #[test]
    fn duplicate_slug_fails_loading() {
        let dir = TestDir::new("duplicate");
        dir.write("twin.md", &post("Twin", "2024-01-01"));
        dir.write("twin.mdx", &post("Twin", "2024-01-01"));

        let err = Keeper::<BlogPost>::new(&dir.path).unwrap_err();
        assert!(matches!(
            err,
            NewKeeperError::DuplicateSlug { ref slug, .. } if slug == "twin"
        ));
    }

    #[test]
    fn duplicate_slug_is_skipped_on_create() {
        let dir = TestDir::new("duplicate-create");
        dir.write("twin.md", &post("Original", "2024-01-01"));
        let mut keeper = ArcMutex::new(Keeper::<BlogPost>::new(&dir.path).unwrap());

        let copy = dir.write("twin.mdx", &post("Copy", "2024-01-01"));
        keeper.handle_event(event(EventKind::Create(CreateKind::File), &copy));
        keeper.handle_event(event(EventKind::Modify(ModifyKind::Name(RenameMode::Any)), &copy));

        assert_eq!(vec!["twin"], slugs(&keeper));
        assert_eq!("Original", keeper.lock().unwrap().get("twin").unwrap().title);
    }

    #[test]
    fn missing_dir_fails_loading() {
        let dir = TestDir::new("missing");
        assert!(Keeper::<BlogPost>::new(&dir.path.join("nope")).is_err());
    }

    #[test]
    fn events_refresh_in_place() {
        let dir = TestDir::new("events");
        dir.write("first.md", &post("First", "2024-01-01"));
        let mut keeper = ArcMutex::new(Keeper::<BlogPost>::new(&dir.path).unwrap());

        let second = dir.write("second.md", &post("Second", "2024-02-01"));
        keeper.handle_event(event(EventKind::Create(CreateKind::File), &second));
        assert_eq!(vec!["first", "second"], slugs(&keeper));

        dir.write("second.md", &post("Second, edited", "2024-02-01"));
        keeper.handle_event(event(
            EventKind::Modify(ModifyKind::Data(notify::event::DataChange::Content)),
            &second,
        ));
        assert_eq!(
            "Second, edited",
            keeper.lock().unwrap().get("second").unwrap().title
        );

        std::fs::remove_file(&second).unwrap();
        keeper.handle_event(event(EventKind::Remove(RemoveKind::File), &second));
        assert_eq!(vec!["first"], slugs(&keeper));
    }

    #[test]
    fn rename_moves_entry() {
        let dir = TestDir::new("rename");
        let old = dir.write("old.md", &post("Moving", "2024-01-01"));
        let mut keeper = ArcMutex::new(Keeper::<BlogPost>::new(&dir.path).unwrap());

        let new = dir.path.join("new.md");
        std::fs::rename(&old, &new).unwrap();
        keeper.handle_event(event(EventKind::Modify(ModifyKind::Name(RenameMode::Any)), &old));
        keeper.handle_event(event(EventKind::Modify(ModifyKind::Name(RenameMode::Any)), &new));

        assert_eq!(vec!["new"], slugs(&keeper));
    }

    #[test]
    fn broken_edit_keeps_previous_entry() {
        let dir = TestDir::new("broken-edit");
        let path = dir.write("post.md", &post("Good", "2024-01-01"));
        let mut keeper = ArcMutex::new(Keeper::<BlogPost>::new(&dir.path).unwrap());

        dir.write("post.md", "---\ntitle: [unclosed\n---\n");
        keeper.handle_event(event(
            EventKind::Modify(ModifyKind::Data(notify::event::DataChange::Any)),
            &path,
        ));

        assert_eq!("Good", keeper.lock().unwrap().get("post").unwrap().title);
    }

    #[test]
    fn other_files_are_ignored() {
        let dir = TestDir::new("ignored");
        let mut keeper = ArcMutex::new(Keeper::<BlogPost>::new(&dir.path).unwrap());

        let path = dir.write("draft.txt", &post("Draft", "2024-01-01"));
        keeper.handle_event(event(EventKind::Create(CreateKind::File), &path));

        assert!(keeper.lock().unwrap().is_empty());
    }

    #[test]
    fn event_kinds() {
        assert_eq!(
            FsEvent::Rename,
            FsEvent::from(EventKind::Modify(ModifyKind::Name(RenameMode::Any)))
        );
        assert_eq!(
            FsEvent::Create,
            FsEvent::from(EventKind::Create(CreateKind::File))
        );
        assert_eq!(
            FsEvent::Delete,
            FsEvent::from(EventKind::Remove(RemoveKind::File))
        );
        assert!(matches!(
            FsEvent::from(EventKind::Create(CreateKind::Folder)),
            FsEvent::Unhandled(_)
        ));
    }
}
