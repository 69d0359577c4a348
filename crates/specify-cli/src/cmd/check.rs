use crate::output::{print_json, print_table};
use specify_core::{
    network::{self, ReleaseChannel, ReleaseCheck},
    tools,
};

/// Report which tools are installed. Missing tools never fail the command.
pub fn run(skip_tls: bool, offline: bool, json: bool) -> anyhow::Result<()> {
    let statuses = tools::check_all();
    let release = if offline {
        ReleaseCheck::Skipped
    } else {
        network::check_release(&ReleaseChannel::from_env(), skip_tls)
    };

    if json {
        let value = serde_json::json!({
            "tools": statuses,
            "release": release,
        });
        return print_json(&value);
    }

    let rows = statuses
        .iter()
        .map(|s| {
            vec![
                s.name.clone(),
                if s.found { "found" } else { "missing" }.to_string(),
                s.description.clone(),
                s.path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            ]
        })
        .collect();
    print_table(&["TOOL", "STATUS", "DESCRIPTION", "PATH"], rows);

    match release {
        ReleaseCheck::Reachable { release } => {
            println!("\nLatest template release: {}", release.tag_name)
        }
        ReleaseCheck::Unreachable { reason } => {
            println!("\nwarning: could not check template releases: {reason}")
        }
        ReleaseCheck::Skipped => {}
    }

    let git_found = statuses.iter().any(|s| s.name == "git" && s.found);
    if !git_found {
        println!("\nTip: install git for repository management.");
    }
    println!("\nspecify is ready to use.");
    Ok(())
}
