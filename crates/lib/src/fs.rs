use camino::{Utf8Path as Path, Utf8PathBuf as PathBuf};

pub const MARKDOWN_EXTENSIONS: [&str; 2] = ["md", "mdx"];

pub fn path_has_extensions(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .is_some_and(|ext| extensions.contains(&ext))
}

pub fn filepaths_with_extensions(
    dir: &Path,
    extensions: &[&str],
) -> Result<Vec<PathBuf>, std::io::Error> {
    dir.read_dir_utf8()?
        .filter_map(|entry| {
            entry
                .map(|entry| {
                    let path = entry.path().to_path_buf();
                    if !path.is_file() {
                        return None;
                    }
                    if path_has_extensions(&path, extensions) {
                        Some(path)
                    } else {
                        None
                    }
                })
                .transpose()
        })
        .collect()
}

#[cfg(test)]
mod test {
    use camino::Utf8Path;

    use super::{path_has_extensions, MARKDOWN_EXTENSIONS};

    #[test]
    fn markdown_extensions() {
        assert!(path_has_extensions(
            Utf8Path::new("blog/first-post.md"),
            &MARKDOWN_EXTENSIONS
        ));
        assert!(path_has_extensions(
            Utf8Path::new("blog/first-post.mdx"),
            &MARKDOWN_EXTENSIONS
        ));
        assert!(!path_has_extensions(
            Utf8Path::new("blog/.first-post.mdx.swp"),
            &MARKDOWN_EXTENSIONS
        ));
        assert!(!path_has_extensions(
            Utf8Path::new("blog/README"),
            &MARKDOWN_EXTENSIONS
        ));
    }
}
