use clap::{Args, Parser, Subcommand};
use reqwest::{Method, RequestBuilder};

#[derive(Parser)]
#[command(name = "vts-cli")]
#[command(about = "Command-line client for the virtual table server", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8888")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Cell {
    /// Table name
    table: String,
    #[arg(long)]
    row: Option<usize>,
    #[arg(long)]
    col: Option<usize>,
    #[arg(long)]
    delimiter: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Read a row or cell
    Get(Cell),
    /// Take a row or cell out of a table
    Pop {
        #[command(flatten)]
        cell: Cell,
        /// Remove only the cell, keep the rest of the row
        #[arg(long)]
        keep_row: bool,
    },
    /// Insert a row or cell
    Push {
        #[command(flatten)]
        cell: Cell,
        /// Row (or cell) content
        data: String,
    },
    /// Create a table, optionally loaded from a file on the server
    Create {
        table: String,
        #[arg(long)]
        filename: Option<String>,
        #[arg(long)]
        delimiter: Option<String>,
    },
    /// Delete a table
    Delete { table: String },
    /// Reload a table from its file
    Reload {
        table: String,
        #[arg(long)]
        filename: Option<String>,
        #[arg(long)]
        delimiter: Option<String>,
    },
}

impl Cell {
    fn request(&self, client: &reqwest::Client, method: Method, base: &str, cmd: &str) -> RequestBuilder {
        let mut query = vec![("cmd", cmd.to_string())];
        if let Some(row) = self.row {
            query.push(("row", row.to_string()));
        }
        if let Some(col) = self.col {
            query.push(("col", col.to_string()));
        }
        if let Some(delimiter) = &self.delimiter {
            query.push(("delimiter", delimiter.clone()));
        }
        client
            .request(method, format!("{}/vts/table/{}", base, self.table))
            .query(&query)
    }
}

fn manager(
    client: &reqwest::Client,
    base: &str,
    cmd: &str,
    table: &str,
    filename: Option<&str>,
    delimiter: Option<&str>,
) -> RequestBuilder {
    let mut query = vec![("cmd", cmd), ("table", table)];
    if let Some(filename) = filename {
        query.push(("filename", filename));
    }
    if let Some(delimiter) = delimiter {
        query.push(("delimiter", delimiter));
    }
    client.get(format!("{}/vts/manager", base)).query(&query)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let request = match &cli.command {
        Commands::Get(cell) => cell.request(&client, Method::GET, base, "get"),
        Commands::Pop { cell, keep_row } => cell
            .request(&client, Method::GET, base, "pop")
            .query(&[("deleterow", (!keep_row).to_string())]),
        Commands::Push { cell, data } => cell.request(&client, Method::POST, base, "push").body(data.clone()),
        Commands::Create { table, filename, delimiter } => {
            manager(&client, base, "create", table, filename.as_deref(), delimiter.as_deref())
        }
        Commands::Delete { table } => manager(&client, base, "delete", table, None, None),
        Commands::Reload { table, filename, delimiter } => {
            manager(&client, base, "reload", table, filename.as_deref(), delimiter.as_deref())
        }
    };

    print_response(request.send().await?).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = plain_text(&res.text().await?);
    if status.is_success() {
        println!("{}", text);
    } else {
        eprintln!("Error: server returned status {}", status);
        eprintln!("{}", text);
        std::process::exit(1);
    }
    Ok(())
}

/// Undo the HTML markup of the server's help and error pages.
fn plain_text(body: &str) -> String {
    body.replace("<br/>", "\n")
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
