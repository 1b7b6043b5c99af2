//! R driver program wrapped around one invocation.
//!
//! The user's script is embedded as a string literal and evaluated into a new
//! environment, the entry function is looked up there and called with the
//! marshalled vectors, and every named result element is reported on stdout as
//! a marker line (see [`super::protocol`]).

use crate::marshal::{quote_r_string, RVector};

use super::protocol::MARKER;

const PRELUDE: &str = r#"
.ranalysis_emit <- function(tag, ...) {
  fields <- vapply(list(...), function(s) {
    bytes <- charToRaw(enc2utf8(as.character(s)))
    paste0("x", paste(as.character(bytes), collapse = ""))
  }, character(1))
  cat("\n", paste(c("__MARKER__", tag, fields), collapse = " "), "\n", sep = "")
}
.ranalysis_fail <- function(phase, message) {
  .ranalysis_emit("error", phase, message)
  quit(save = "no", status = 3)
}
.ranalysis_render <- function(value) {
  paste(utils::capture.output(print(value)), collapse = "\n")
}
.ranalysis_env <- new.env()
"#;

/// Render the complete driver program.
pub fn render(script_source: &str, entry: &str, args: &[RVector]) -> String {
    let entry_lit = quote_r_string(entry);
    let call_args: Vec<String> = args.iter().map(RVector::to_r_literal).collect();

    let mut program = PRELUDE.replace("__MARKER__", MARKER);
    program.push_str(&format!(
        "tryCatch(\n  eval(parse(text = {script}, keep.source = FALSE), envir = .ranalysis_env),\n  error = function(e) .ranalysis_fail(\"load\", conditionMessage(e))\n)\n",
        script = quote_r_string(script_source)
    ));
    program.push_str(&format!(
        "if (!exists({entry_lit}, envir = .ranalysis_env, mode = \"function\", inherits = FALSE)) {{\n  .ranalysis_fail(\"resolve\", {entry_lit})\n}}\n"
    ));
    program.push_str(&format!(
        ".ranalysis_entry <- get({entry_lit}, envir = .ranalysis_env, mode = \"function\", inherits = FALSE)\n"
    ));
    program.push_str(&format!(
        ".ranalysis_result <- tryCatch(\n  .ranalysis_entry({}),\n  error = function(e) .ranalysis_fail(\"invoke\", conditionMessage(e))\n)\n",
        call_args.join(", ")
    ));
    program.push_str(
        r#".ranalysis_names <- names(.ranalysis_result)
if (is.null(.ranalysis_names) || length(.ranalysis_names) == 0L) {
  .ranalysis_fail("result", "unnamed")
}
for (.ranalysis_i in seq_along(.ranalysis_names)) {
  .ranalysis_emit("result", .ranalysis_names[[.ranalysis_i]],
                  .ranalysis_render(.ranalysis_result[[.ranalysis_i]]))
}
.ranalysis_emit("done")
"#,
    );
    program
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arguments_follow_given_order() {
        let program = render(
            "process_data <- function(x, y) list(a = x)",
            "process_data",
            &[
                RVector::Numeric(vec![1.0, 2.0]),
                RVector::Character(vec!["b".into()]),
            ],
        );
        assert!(program.contains(r#".ranalysis_entry(c(1.0, 2.0), c("b"))"#));
        assert!(program.contains(r#"exists("process_data", envir = .ranalysis_env"#));
        assert!(!program.contains("__MARKER__"));
    }

    #[test]
    fn entry_lookup_stays_in_script_environment() {
        let program = render("", "print", &[]);
        assert!(program.contains(
            r#"exists("print", envir = .ranalysis_env, mode = "function", inherits = FALSE)"#
        ));
        assert!(program.contains(
            r#"get("print", envir = .ranalysis_env, mode = "function", inherits = FALSE)"#
        ));
    }

    #[test]
    fn script_source_is_embedded_as_literal() {
        let program = render("f <- function() \"hi\"\n", "f", &[]);
        assert!(program.contains(r#"parse(text = "f <- function() \"hi\"\n""#));
        assert!(program.contains(".ranalysis_entry()"));
    }
}
