use crate::select::HunkSelection;
use crate::text::DiffText;

/// Build a patch containing only the selected hunks, for `git apply`.
///
/// Each selected file header is written out followed by its own hunks.
/// `---`/`+++` lines lose trailing whitespace, which `git apply` rejects;
/// every other line is copied verbatim. Every emitted line ends with
/// exactly one newline.
pub fn build_patch(selection: &HunkSelection<'_>, text: &DiffText) -> String {
    let mut patch = String::new();

    for (header, hunks) in selection.groups() {
        for line in text.lines_in(header) {
            let content = text.line_text(line);
            if content.starts_with("---") || content.starts_with("+++") {
                patch.push_str(content.trim_end());
            } else {
                patch.push_str(content);
            }
            patch.push('\n');
        }

        for hunk in hunks {
            for line in text.lines_in(hunk.span) {
                patch.push_str(text.line_text(line));
                patch.push('\n');
            }
        }
    }

    patch
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::diff::parse_diff;
    use crate::select::resolve_selection;
    use crate::text::Span;
    use similar_asserts::assert_eq;

    const TWO_FILES: &str = r#"diff --git a/flake.nix b/flake.nix
index abc1234..def5678 100644
--- a/flake.nix
+++ b/flake.nix
@@ -135,2 +135,3 @@ outputs
   let
+      debug = true;
   in
@@ -140,2 +141,3 @@ outputs
   modules = [
+        ./flake-modules/home-manager.nix
   ];
diff --git a/gtk.nix b/gtk.nix
index 111..222 100644
--- a/gtk.nix
+++ b/gtk.nix
@@ -11,2 +11,3 @@
 line 11
+    gtk.cursorTheme.size = 24;
 line 12
"#;

    fn patch_for(text: &DiffText, selection: &[Span]) -> String {
        let doc = parse_diff(text);
        let lookup = doc.lookup();
        build_patch(&resolve_selection(&lookup, selection, text.len()), text)
    }

    #[test]
    fn empty_selection_builds_empty_patch() {
        let text = DiffText::new(TWO_FILES);
        assert_eq!(patch_for(&text, &[]), "");
    }

    #[test]
    fn single_hunk_of_second_file() {
        let text = DiffText::new(TWO_FILES);
        let cursor = text.as_str().find("cursorTheme").unwrap();

        let patch = patch_for(&text, &[Span::point(cursor)]);

        assert!(!patch.contains("flake.nix"));
        insta::assert_snapshot!(patch, @r#"
        diff --git a/gtk.nix b/gtk.nix
        index 111..222 100644
        --- a/gtk.nix
        +++ b/gtk.nix
        @@ -11,2 +11,3 @@
         line 11
        +    gtk.cursorTheme.size = 24;
         line 12
        "#);
    }

    #[test]
    fn one_of_two_hunks_in_a_file() {
        let text = DiffText::new(TWO_FILES);
        let cursor = text.as_str().find("home-manager").unwrap();

        let patch = patch_for(&text, &[Span::point(cursor)]);

        assert_eq!(
            patch,
            "diff --git a/flake.nix b/flake.nix\n\
             index abc1234..def5678 100644\n\
             --- a/flake.nix\n\
             +++ b/flake.nix\n\
             @@ -140,2 +141,3 @@ outputs\n   modules = [\n+        ./flake-modules/home-manager.nix\n   ];\n"
        );
    }

    #[test]
    fn whole_buffer_reproduces_input() {
        let text = DiffText::new(TWO_FILES);
        assert_eq!(patch_for(&text, &[Span::new(0, text.len())]), TWO_FILES);
    }

    #[test]
    fn path_lines_lose_trailing_whitespace() {
        let text = DiffText::new(
            "diff --git a/x b/x\nindex 1..2 100644\n--- a/x\t\n+++ b/x  \n@@ -1 +1 @@\n-a \n+b\n",
        );
        let patch = patch_for(&text, &[Span::point(text.len())]);

        assert_eq!(
            patch,
            "diff --git a/x b/x\nindex 1..2 100644\n--- a/x\n+++ b/x\n@@ -1 +1 @@\n-a \n+b\n"
        );
    }

    #[test]
    fn unterminated_final_line_gets_newline() {
        let text = DiffText::new("diff --git a/x b/x\n--- a/x\n+++ b/x\n@@ -1 +1 @@\n-a\n+b");
        let patch = patch_for(&text, &[Span::point(text.len())]);
        assert!(patch.ends_with("+b\n"));
    }

    #[test]
    fn no_newline_marker_is_carried() {
        let text = DiffText::new(
            "diff --git a/x b/x\n--- a/x\n+++ b/x\n@@ -1 +1 @@\n-a\n\\ No newline at end of file\n+a\n",
        );
        let patch = patch_for(&text, &[Span::point(text.len())]);
        assert_eq!(patch, text.as_str());
    }

    #[test]
    fn headers_are_followed_by_their_own_hunks() {
        let text = DiffText::new(TWO_FILES);
        let flake = text.as_str().find("debug").unwrap();
        let gtk = text.as_str().find("cursorTheme").unwrap();

        // Selections arrive out of buffer order.
        let patch = patch_for(&text, &[Span::point(gtk), Span::point(flake)]);

        let flake_header = patch.find("diff --git a/flake.nix").unwrap();
        let flake_hunk = patch.find("debug = true").unwrap();
        let gtk_header = patch.find("diff --git a/gtk.nix").unwrap();
        let gtk_hunk = patch.find("cursorTheme").unwrap();
        assert!(flake_header < flake_hunk);
        assert!(flake_hunk < gtk_header);
        assert!(gtk_header < gtk_hunk);
        assert!(!patch.contains("home-manager"));
    }

    #[test]
    fn hunk_before_merge_section_stays_clean() {
        let text = DiffText::new(
            "diff --git a/a b/a\n--- a/a\n+++ b/a\n@@ -1 +1 @@\n-x\n+y\n\
             diff --cc c\nindex 1,2..3\n--- a/c\n+++ b/c\n@@@ -1,1 -1,1 +1,1 @@@\n- one\n -two\n++three\n",
        );
        let cursor = text.as_str().find("+y").unwrap();

        let patch = patch_for(&text, &[Span::point(cursor)]);

        assert_eq!(patch, "diff --git a/a b/a\n--- a/a\n+++ b/a\n@@ -1 +1 @@\n-x\n+y\n");
        assert_eq!(patch_for(&text, &[Span::point(text.len())]), "");
    }
}
