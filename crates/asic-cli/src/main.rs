//! Command-line interface for building, extending and inspecting ASiC
//! containers.
//!
//! Signatures and manifests are supplied as pre-computed files; this tool
//! only arranges them into containers.

use asic_rs::{
    build_container, can_be_signed, extend_container, ArchiveExtractor, ContainerParameters,
    ContainerType, Document, FileDocument, MimeType, SignatureProfile, ZipContainerExtractor,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::info;
use zip::ZipArchive;

#[derive(Parser)]
#[command(name = "asic")]
#[command(about = "ASiC container tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a new container
    Build {
        /// Container type
        #[arg(short = 't', long = "type", value_enum, default_value = "extended")]
        container_type: Flavor,

        /// Signed document (repeatable)
        #[arg(short, long = "document", required = true)]
        documents: Vec<PathBuf>,

        /// Signature member as NAME=PATH (repeatable)
        #[arg(short, long = "signature")]
        signatures: Vec<String>,

        /// Manifest member as NAME=PATH (repeatable, extended containers only)
        #[arg(short, long = "manifest")]
        manifests: Vec<String>,

        /// Add the mimetype archive comment
        #[arg(long)]
        comment: bool,

        /// Override the declared content type
        #[arg(long)]
        mime_type: Option<String>,

        /// ZIP compression level (0-9, default: 6)
        #[arg(short = 'z', long, default_value = "6")]
        zip_level: u32,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Replace the signatures of an existing container
    Extend {
        /// Existing container
        archive: PathBuf,

        /// Signature scheme of the container
        #[arg(short, long, value_enum, default_value = "xades")]
        profile: Profile,

        /// Signature member as NAME=PATH (repeatable)
        #[arg(short, long = "signature", required = true)]
        signatures: Vec<String>,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// List the members of a container
    Inspect {
        archive: PathBuf,

        #[arg(short, long, value_enum, default_value = "xades")]
        profile: Profile,
    },

    /// Check whether a container may be re-signed
    Check {
        archive: PathBuf,

        #[arg(short = 't', long = "type", value_enum, default_value = "extended")]
        container_type: Flavor,

        #[arg(short, long, value_enum, default_value = "xades")]
        profile: Profile,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Flavor {
    Simple,
    Extended,
}

impl From<Flavor> for ContainerType {
    fn from(flavor: Flavor) -> Self {
        match flavor {
            Flavor::Simple => ContainerType::Simple,
            Flavor::Extended => ContainerType::Extended,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Profile {
    Xades,
    Cades,
}

impl From<Profile> for SignatureProfile {
    fn from(profile: Profile) -> Self {
        match profile {
            Profile::Xades => SignatureProfile::XADES,
            Profile::Cades => SignatureProfile::CADES,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Build {
            container_type,
            documents,
            signatures,
            manifests,
            comment,
            mime_type,
            zip_level,
            output,
        } => {
            let mut params = ContainerParameters::new(container_type.into())
                .zip_comment(comment)
                .compression_level(zip_level);
            if let Some(mime_type) = mime_type {
                params = params.mime_type(mime_type);
            }

            let documents: Vec<FileDocument> = documents.iter().map(FileDocument::new).collect();
            let signatures = named_members(&signatures)?;
            let manifests = named_members(&manifests)?;

            let container = build_container(&documents, &signatures, &manifests, &params)?;
            std::fs::write(&output, container.bytes())?;
            info!(output = %output.display(), bytes = container.len(), "container built");
        }
        Command::Extend {
            archive,
            profile,
            signatures,
            output,
        } => {
            let existing = container_document(&archive);
            let signatures = named_members(&signatures)?;

            let container = extend_container(&existing, &signatures, &profile.into())?;
            std::fs::write(&output, container.bytes())?;
            info!(output = %output.display(), bytes = container.len(), "container extended");
        }
        Command::Inspect { archive, profile } => {
            inspect(&archive, profile.into())?;
        }
        Command::Check {
            archive,
            container_type,
            profile,
        } => {
            let existing = container_document(&archive);
            let params = ContainerParameters::new(container_type.into());
            if can_be_signed(&[existing], &params, &profile.into())? {
                println!("OK: {} can be signed", archive.display());
            } else {
                println!(
                    "REJECTED: {} does not match {} with {} signatures",
                    archive.display(),
                    params.mime_type_string(),
                    SignatureProfile::from(profile).name
                );
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// Parses `NAME=PATH` pairs into named file documents.
fn named_members(specs: &[String]) -> Result<Vec<FileDocument>, Box<dyn std::error::Error>> {
    specs
        .iter()
        .map(|spec| -> Result<FileDocument, Box<dyn std::error::Error>> {
            let (name, path) = spec
                .split_once('=')
                .ok_or_else(|| format!("Expected NAME=PATH, got '{spec}'"))?;
            Ok(FileDocument::new(path).with_name(name))
        })
        .collect()
}

/// Opens a container; the content type is taken from its `mimetype`
/// member when present, otherwise guessed from the file extension.
fn container_document(path: &Path) -> FileDocument {
    let document = FileDocument::new(path);
    match declared_mime_type(&document) {
        Some(mime_type) => document.with_mime_type(mime_type),
        None => document,
    }
}

fn declared_mime_type(document: &FileDocument) -> Option<MimeType> {
    let bytes = document.to_bytes().ok()?;
    let mut archive = ZipArchive::new(Cursor::new(bytes)).ok()?;
    let mut mimetype = archive.by_name("mimetype").ok()?;
    let mut value = String::new();
    std::io::Read::read_to_string(&mut mimetype, &mut value).ok()?;
    Some(MimeType::new(value.trim()))
}

fn inspect(path: &Path, profile: SignatureProfile) -> Result<(), Box<dyn std::error::Error>> {
    let document = container_document(path);
    let bytes = document.to_bytes()?;
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    println!("{} ({})", path.display(), document.mime_type());
    for i in 0..archive.len() {
        let entry = archive.by_index_raw(i)?;
        println!(
            "  {:<40} {:<10} {:>10} {:>10} {:08x}",
            entry.name(),
            format!("{:?}", entry.compression()),
            entry.size(),
            entry.compressed_size(),
            entry.crc32()
        );
    }
    let comment = archive.comment();
    if !comment.is_empty() {
        println!("  comment: {}", String::from_utf8_lossy(comment));
    }

    let content = ZipContainerExtractor::new(profile).extract(&document)?;
    let categories = [
        ("signatures", &content.signature_documents),
        ("manifests", &content.manifest_documents),
        ("archive manifests", &content.archive_manifest_documents),
        ("timestamps", &content.timestamp_documents),
        ("signed documents", &content.signed_documents),
    ];
    for (label, documents) in categories {
        let names: Vec<&str> = documents.iter().filter_map(|d| d.name()).collect();
        println!("{label}: {}", names.join(", "));
    }

    Ok(())
}
