//! Example: Read a public repository and list the documents
//!
//! Run with: GITHUB_TOKEN=... cargo run -p repokit --example read_repo -- octocat/Hello-World master .md
//!
//! Arguments: `<owner/repo> [ref] [extension...]`

use repokit::{GitHubRepositoryReader, RunRequest, Secret};

#[tokio::main]
async fn main() {
    let mut args = std::env::args().skip(1);
    let repository = args
        .next()
        .unwrap_or_else(|| "octocat/Hello-World".to_string());
    let git_ref = args.next().unwrap_or_else(|| "master".to_string());
    let mut extensions: Vec<String> = args.collect();
    if extensions.is_empty() {
        extensions = vec![".md".to_string(), ".txt".to_string(), "".to_string()];
    }

    println!("RepoKit read example");
    println!("====================\n");
    println!("Repository: {}", repository);
    println!("Ref:        {}", git_ref);
    println!("Extensions: {:?}\n", extensions);

    let reader = match GitHubRepositoryReader::builder()
        .access_token(Secret::from_env_vars(["GITHUB_TOKEN", "GH_TOKEN"], false))
        .repository(&repository)
        .file_extensions(extensions)
        .git_ref(&git_ref)
        .build()
    {
        Ok(reader) => reader,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    match reader.run(RunRequest::new()).await {
        Ok(output) => {
            for (i, doc) in output.documents.iter().enumerate() {
                println!(
                    "{}. {} ({} chars, id {})",
                    i + 1,
                    doc.meta.file_path,
                    doc.content.chars().count(),
                    doc.id
                );
            }
            println!("\n{} documents", output.documents.len());
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
