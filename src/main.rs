/*
 * ==========================================================================
 * PAWX - Code with Claws!
 * ==========================================================================
 *
 * Author:   Sam Wilcox
 * Email:    sam@pawx-lang.com
 * Website:  https://www.pawx-lang.com
 * Github:   https://github.com/samwilcox/pawx
 *
 * License:
 * This file is part of the PAWX programming language project.
 *
 * PAWX is dual-licensed under the terms of:
 *   - The MIT license
 *   - The Apache License, Version 2.0
 *
 * You may choose either license to govern your use of this software.
 * Full license text available at:
 *    https://license.pawx-lang.com
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under these licenses is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *
 * ==========================================================================
 */

//! clowder: walks through class construction under a validating authority,
//! then loads compiled-in extensions named by a remote manifest.
//!
//! ```bash
//! # Bundled manifest, no network
//! clowder
//!
//! # Manifest from a URL, pinned to a digest
//! clowder --remote-url https://example.com/manifest.json --pin <sha256>
//!
//! # Only the class walkthrough
//! clowder --skip-remote
//! ```

use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use clowder::authority::{ConstructionAuthority, StdoutSink, ValidatingAuthority};
use clowder::interpreter::display::value_to_string;
use clowder::prototypes::extensions::ExtensionRegistry;
use clowder::prototypes::http::{Fetcher, HttpFetcher, StaticFetcher};
use clowder::remote::RemoteLoader;
use clowder::{ClassDeclaration, Config, Runtime, Value};

const BUNDLED_URL: &str = "bundled://manifest.json";
const BUNDLED_MANIFEST: &str = r#"{
    "description": "greeting shipped with the runtime",
    "extensions": ["from_internet"]
}"#;

#[derive(Parser)]
#[command(
    name = "clowder",
    version,
    about = "Class construction through a validating authority"
)]
struct Cli {
    /// JSON config file (CLOWDER_* environment variables still apply on top)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Manifest URL (default: the bundled manifest)
    #[arg(long)]
    remote_url: Option<String>,

    /// Expected hex SHA-256 of the manifest
    #[arg(long)]
    pin: Option<String>,

    /// Skip the remote extension section
    #[arg(long)]
    skip_remote: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let remote_url = cli.remote_url.clone().or_else(|| config.remote.url.clone());
    let fetcher: Rc<dyn Fetcher> = match &remote_url {
        Some(_) => Rc::new(HttpFetcher::from_config(&config.remote)),
        None => Rc::new(StaticFetcher::new().with(BUNDLED_URL, BUNDLED_MANIFEST)),
    };

    let runtime = Runtime::new(Rc::clone(&fetcher));
    let authority = ValidatingAuthority::from_config(&config, Rc::new(StdoutSink))?;

    banner("Using a construction authority");
    walkthrough(&runtime, &authority)?;

    if cli.skip_remote {
        return Ok(());
    }

    banner("Using a remote manifest");
    let loader = RemoteLoader::new(fetcher, ExtensionRegistry::with_builtins())
        .pinned(cli.pin.clone().or_else(|| config.remote.pinned_sha256.clone()));

    let url = remote_url.as_deref().unwrap_or(BUNDLED_URL);
    let bound = runtime
        .load_extensions(&loader, url)
        .with_context(|| format!("loading extensions from {}", url))?;

    println!("Bound from manifest: {}", bound.join(", "));
    runtime.call_global("from_internet", vec![])?;

    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            Config::from_json(&text)?
        }
        None => Config::default(),
    };

    config.apply_env(|key| std::env::var(key).ok())?;
    Ok(config)
}

fn walkthrough(runtime: &Runtime, authority: &dyn ConstructionAuthority) -> Result<()> {
    let person = ClassDeclaration::new("Person")
        .method("new", |this, args| {
            let mut args = args.into_iter();
            this.set("name", args.next().unwrap_or(Value::Null));
            this.set("age", args.next().unwrap_or(Value::Null));
            Ok(Value::Null)
        })
        .method("speak", |this, _| {
            println!(
                "Hi, my name is {}, I am {} years old.",
                this.field("name").as_string().unwrap_or("nobody"),
                this.field("age").as_number().unwrap_or(0.0)
            );
            Ok(Value::Null)
        })
        .method("run", |_, _| {
            println!("I run");
            Ok(Value::Null)
        });

    let class = runtime.declare_class(person, authority)?;
    let p = runtime.instantiate("Person", vec![Value::from("Jo"), Value::from(30.0)])?;

    let p_value = Value::Instance(p.clone());
    let person_value = Value::Class(Rc::clone(&class));

    println!("The class of `p` is {}", value_to_string(&person_value));
    println!("\t* `p` is {}", value_to_string(&p_value));
    println!("\t* `p` is a class: {}", p_value.is_class());
    println!("\t* `p` is an instance of `Person`: {}", p.is_instance_of(&class));
    println!("The authority of `Person` is {}", class.authority());
    println!("\t* `Person` is a class: {}", person_value.is_class());
    println!(
        "\t* members of `Person`: {}",
        class.member_names().collect::<Vec<_>>().join(", ")
    );

    p.call("speak", vec![])?;
    p.call("run", vec![])?;
    p.call("_run", vec![])?;

    let mute = ClassDeclaration::new("Mime").method("run", |_, _| Ok(Value::Null));
    if let Err(err) = runtime.declare_class(mute, authority) {
        println!("\nDeclaring `Mime` without `speak` is refused:\n{}", err);
    }

    Ok(())
}

fn banner(title: &str) {
    println!("\n\n==========");
    println!("{}", title);
    println!("==========\n\n");
}
