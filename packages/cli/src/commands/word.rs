use super::open_page;
use crate::config::Config;
use anyhow::Result;
use beacon_dom::Document;
use beacon_export::{compile_to_word_html, compile_to_wordml, WordOptions};
use clap::{Args, ValueEnum};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WordFormat {
    /// WordprocessingML 2003 XML
    Xml,
    /// HTML with Office namespaces
    Html,
}

#[derive(Debug, Args)]
pub struct WordArgs {
    /// HTML page to export
    pub input: String,

    /// Output file (defaults to the page name with .doc)
    #[arg(short, long)]
    pub output: Option<String>,

    #[arg(short, long, value_enum, default_value = "xml")]
    pub format: WordFormat,

    /// Document title (defaults to the page <title>)
    #[arg(short, long)]
    pub title: Option<String>,

    /// Apply the current saved version before exporting
    #[arg(long)]
    pub live: bool,
}

pub async fn word(args: WordArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;

    let document = if args.live {
        let store = config.rest_store()?;
        let controller = open_page(&config, cwd, &args.input, Some(store)).await?;
        controller.surface().document().clone()
    } else {
        Document::parse(&fs::read_to_string(PathBuf::from(cwd).join(&args.input))?)
    };

    let options = WordOptions {
        title: args.title.clone(),
        ui_containers: config.editor.ui_containers.clone(),
        ..WordOptions::default()
    };
    let output = match args.format {
        WordFormat::Xml => compile_to_wordml(&document, &options),
        WordFormat::Html => compile_to_word_html(&document, &options),
    };

    let path = PathBuf::from(cwd).join(output_path(&args.input, args.output.as_deref()));
    fs::write(&path, output)?;
    println!("  {} {} → {}", "✓".green(), args.input, path.display());

    Ok(())
}

fn output_path(input: &str, output: Option<&str>) -> PathBuf {
    match output {
        Some(output) => PathBuf::from(output),
        None => {
            let stem = Path::new(input)
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| "page".to_string());
            PathBuf::from(format!("{}.doc", stem))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_defaults_to_doc() {
        assert_eq!(output_path("site/about.html", None), PathBuf::from("about.doc"));
        assert_eq!(output_path("about.html", Some("out/a.doc")), PathBuf::from("out/a.doc"));
    }

    #[tokio::test]
    async fn test_word_export_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().to_str().unwrap();
        fs::write(
            dir.path().join("index.html"),
            "<html><head><title>Home</title></head><body><h1>Hello</h1>\
             <div id=\"beacon-edit-ui\"><p>Edit</p></div></body></html>",
        )
        .unwrap();

        let args = WordArgs {
            input: "index.html".into(),
            output: None,
            format: WordFormat::Xml,
            title: None,
            live: false,
        };
        word(args, cwd).await.unwrap();

        let written = fs::read_to_string(dir.path().join("index.doc")).unwrap();
        assert!(written.contains("Hello"));
        assert!(written.contains("<o:Title>Home</o:Title>"));
        assert!(!written.contains("Edit</w:t>"));
    }
}
