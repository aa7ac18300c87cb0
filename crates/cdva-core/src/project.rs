//! Project bootstrapper
//!
//! Orchestrates the delegated command sequence that turns one `cdva-create`
//! invocation into a full Cordova project: create the project, add platforms,
//! add plugins. Every delegated command's exit code is checked immediately;
//! the first non-zero code aborts the rest of the run. There is no rollback
//! of partially created project state and no retry.

use crate::config::{self, AppConfig, HostOs};
use crate::cordova::{CommandRunner, CordovaCli};
use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::path::Path;

const STARS: &str = "********************************";

/// What the create path was asked to build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRequest {
    /// Folder the project is created in; must not already exist
    pub target_folder: String,
    /// Reverse-domain application identifier
    pub app_id: String,
    /// Human-readable application name (quoted on the command line)
    pub app_name: String,
    /// Explicit platform override from the command line; empty means use the
    /// configured platform list
    pub platforms: Vec<String>,
}

/// Scaffold a project: create, add platforms, add plugins
///
/// Refuses to touch a target folder that already exists - in that case no
/// subprocess is ever spawned. Empty platform or plugin lists produce a
/// warning and skip their step rather than failing.
pub fn create_project(
    request: &CreateRequest,
    settings: &AppConfig,
    runner: &mut dyn CommandRunner,
) -> Result<()> {
    let target = Path::new(&request.target_folder);
    if target.exists() {
        bail!("target folder {} already exists", request.target_folder);
    }

    let platforms: &[String] = if request.platforms.is_empty() {
        &settings.platform_list
    } else {
        &request.platforms
    };

    print_summary(request, platforms, &settings.plugin_list);

    let cli = CordovaCli::new(settings.enable_debug);

    println!();
    println!("{}", "Creating project".yellow());
    println!("{}", STARS);
    let create_args = build_create_args(request, settings);
    run_checked(runner, &cli, &create_args, None)?;

    // Everything from here on runs inside the new project folder
    println!();
    println!(
        "{}",
        format!("Adding platforms [{}] to the project", platforms.join(", ")).yellow()
    );
    println!("{}", STARS);
    if platforms.is_empty() {
        println!("{}", "No platforms specified, skipping".yellow());
    } else {
        let args = format!("platform add {}", platforms.join(" "));
        run_checked(runner, &cli, &args, Some(target))?;
    }

    println!();
    println!("{}", "Adding plugins".yellow());
    println!("{}", STARS);
    if settings.plugin_list.is_empty() {
        println!(
            "{}",
            "No plugins specified in the configuration file, skipping".yellow()
        );
    } else {
        for plugin in &settings.plugin_list {
            println!("{}", format!("Adding {} plugin to project", plugin).yellow());
            let args = format!("plugin add {}", plugin);
            run_checked(runner, &cli, &args, Some(target))?;
        }
    }

    println!();
    println!("{}", "All done!".green());
    Ok(())
}

/// Open the configuration file with the host's default file handler
pub fn edit_config(os: HostOs) -> Result<()> {
    let path = config::config_path(os)?;
    println!("Launching {}", path.display());
    open::that(&path).with_context(|| format!("Failed to open {}", path.display()))?;
    Ok(())
}

/// Arguments for the `cordova create` step
///
/// A non-empty `copyFrom` pointing at an existing path wins over `linkTo`;
/// the two options never appear together. `createParms` is appended verbatim.
fn build_create_args(request: &CreateRequest, settings: &AppConfig) -> String {
    let mut args = format!(
        "create {} {} \"{}\"",
        request.target_folder, request.app_id, request.app_name
    );

    if !settings.copy_from.is_empty() && Path::new(&settings.copy_from).exists() {
        println!("Enabling --copy-from option (path: {})", settings.copy_from);
        args.push_str(&format!(" --copy-from \"{}\"", settings.copy_from));
    } else if !settings.link_to.is_empty() && Path::new(&settings.link_to).exists() {
        println!("Enabling --link-to option (path: {})", settings.link_to);
        args.push_str(&format!(" --link-to \"{}\"", settings.link_to));
    }

    if !settings.create_parms.is_empty() {
        println!(
            "Appending \"{}\" to the create command",
            settings.create_parms
        );
        args.push(' ');
        args.push_str(&settings.create_parms);
    }

    args
}

fn run_checked(
    runner: &mut dyn CommandRunner,
    cli: &CordovaCli,
    args: &str,
    dir: Option<&Path>,
) -> Result<()> {
    if cli.enable_debug() {
        println!("Enabling debug mode");
    }
    let invocation = cli.invocation(args, dir);
    println!("Command string: {}", invocation.command_line);

    let code = runner.run(&invocation)?;
    if code != 0 {
        bail!("unable to execute command (error code: {})", code);
    }
    Ok(())
}

fn print_summary(request: &CreateRequest, platforms: &[String], plugins: &[String]) {
    println!();
    println!("{}", STARS);
    println!("Application Name: {}", request.app_name);
    println!("Application ID: {}", request.app_id);
    println!("Target folder: {}", request.target_folder);
    println!("Target platforms: {}", platforms.join(", "));
    println!("Plugins: {}", plugins.join(", "));
    println!("{}", STARS);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cordova::CommandInvocation;

    /// Records every invocation and answers with scripted exit codes
    struct RecordingRunner {
        invocations: Vec<CommandInvocation>,
        /// Index of the first command that should report failure
        fail_at: Option<usize>,
    }

    impl RecordingRunner {
        fn new() -> Self {
            Self {
                invocations: Vec::new(),
                fail_at: None,
            }
        }

        fn failing_at(index: usize) -> Self {
            Self {
                invocations: Vec::new(),
                fail_at: Some(index),
            }
        }

        fn command_lines(&self) -> Vec<&str> {
            self.invocations
                .iter()
                .map(|i| i.command_line.as_str())
                .collect()
        }
    }

    impl CommandRunner for RecordingRunner {
        fn run(&mut self, invocation: &CommandInvocation) -> Result<i32> {
            let index = self.invocations.len();
            self.invocations.push(invocation.clone());
            if self.fail_at == Some(index) {
                Ok(1)
            } else {
                Ok(0)
            }
        }
    }

    fn settings() -> AppConfig {
        AppConfig {
            platform_list: vec!["android".into(), "ios".into()],
            plugin_list: vec!["pluginA".into()],
            enable_debug: false,
            copy_from: String::new(),
            link_to: String::new(),
            create_parms: String::new(),
        }
    }

    fn request(target: &str) -> CreateRequest {
        CreateRequest {
            target_folder: target.to_string(),
            app_id: "com.example.app".to_string(),
            app_name: "Example".to_string(),
            platforms: Vec::new(),
        }
    }

    /// Path inside a scratch dir that does not exist yet
    fn fresh_target(dir: &tempfile::TempDir) -> String {
        dir.path().join("foo").to_string_lossy().into_owned()
    }

    #[test]
    fn test_issues_create_platform_plugin_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let target = fresh_target(&dir);
        let mut runner = RecordingRunner::new();

        create_project(&request(&target), &settings(), &mut runner).unwrap();

        assert_eq!(
            runner.command_lines(),
            vec![
                format!("cordova create {} com.example.app \"Example\"", target).as_str(),
                "cordova platform add android ios",
                "cordova plugin add pluginA",
            ]
        );

        // create runs where the tool was started; the rest inside the project
        assert!(runner.invocations[0].working_dir.is_none());
        assert_eq!(
            runner.invocations[1].working_dir.as_deref(),
            Some(Path::new(&target))
        );
        assert_eq!(
            runner.invocations[2].working_dir.as_deref(),
            Some(Path::new(&target))
        );
    }

    #[test]
    fn test_aborts_before_plugins_when_platform_add_fails() {
        let dir = tempfile::tempdir().unwrap();
        let target = fresh_target(&dir);
        let mut runner = RecordingRunner::failing_at(1);

        let err = create_project(&request(&target), &settings(), &mut runner).unwrap_err();
        assert!(err.to_string().contains("error code: 1"));
        assert_eq!(runner.invocations.len(), 2, "no plugin add after failure");
    }

    #[test]
    fn test_existing_target_folder_spawns_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().to_string_lossy().into_owned();
        let mut runner = RecordingRunner::new();

        let err = create_project(&request(&target), &settings(), &mut runner).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert!(runner.invocations.is_empty());
    }

    #[test]
    fn test_command_line_platforms_override_configured_list() {
        let dir = tempfile::tempdir().unwrap();
        let target = fresh_target(&dir);
        let mut runner = RecordingRunner::new();

        let mut request = request(&target);
        request.platforms = vec!["browser".into()];
        create_project(&request, &settings(), &mut runner).unwrap();

        assert_eq!(runner.invocations[1].command_line, "cordova platform add browser");
    }

    #[test]
    fn test_empty_platform_list_warns_and_continues() {
        let dir = tempfile::tempdir().unwrap();
        let target = fresh_target(&dir);
        let mut runner = RecordingRunner::new();

        let mut settings = settings();
        settings.platform_list.clear();
        create_project(&request(&target), &settings, &mut runner).unwrap();

        // No platform add, but the plugin still goes in
        assert_eq!(runner.invocations.len(), 2);
        assert_eq!(runner.invocations[1].command_line, "cordova plugin add pluginA");
    }

    #[test]
    fn test_empty_plugin_list_warns_and_continues() {
        let dir = tempfile::tempdir().unwrap();
        let target = fresh_target(&dir);
        let mut runner = RecordingRunner::new();

        let mut settings = settings();
        settings.plugin_list.clear();
        create_project(&request(&target), &settings, &mut runner).unwrap();

        assert_eq!(runner.invocations.len(), 2);
        assert_eq!(
            runner.invocations[1].command_line,
            "cordova platform add android ios"
        );
    }

    #[test]
    fn test_plugins_added_one_command_each_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let target = fresh_target(&dir);
        let mut runner = RecordingRunner::new();

        let mut settings = settings();
        settings.plugin_list = vec!["pluginA".into(), "pluginB".into()];
        create_project(&request(&target), &settings, &mut runner).unwrap();

        assert_eq!(runner.invocations[2].command_line, "cordova plugin add pluginA");
        assert_eq!(runner.invocations[3].command_line, "cordova plugin add pluginB");
    }

    #[test]
    fn test_debug_flag_prefixes_every_command() {
        let dir = tempfile::tempdir().unwrap();
        let target = fresh_target(&dir);
        let mut runner = RecordingRunner::new();

        let mut settings = settings();
        settings.enable_debug = true;
        create_project(&request(&target), &settings, &mut runner).unwrap();

        for invocation in &runner.invocations {
            assert!(
                invocation.command_line.starts_with("cordova -d "),
                "missing debug flag: {}",
                invocation.command_line
            );
        }
    }

    #[test]
    fn test_copy_from_takes_precedence_over_link_to() {
        let dir = tempfile::tempdir().unwrap();
        let target = fresh_target(&dir);
        let base = dir.path().join("base");
        let linked = dir.path().join("linked");
        std::fs::create_dir(&base).unwrap();
        std::fs::create_dir(&linked).unwrap();

        let mut settings = settings();
        settings.copy_from = base.to_string_lossy().into_owned();
        settings.link_to = linked.to_string_lossy().into_owned();

        let mut runner = RecordingRunner::new();
        create_project(&request(&target), &settings, &mut runner).unwrap();

        let create = &runner.invocations[0].command_line;
        assert!(create.contains(&format!("--copy-from \"{}\"", settings.copy_from)));
        assert!(!create.contains("--link-to"));
    }

    #[test]
    fn test_link_to_used_when_copy_from_unresolvable() {
        let dir = tempfile::tempdir().unwrap();
        let target = fresh_target(&dir);
        let linked = dir.path().join("linked");
        std::fs::create_dir(&linked).unwrap();

        let mut settings = settings();
        settings.copy_from = dir.path().join("no-such-dir").to_string_lossy().into_owned();
        settings.link_to = linked.to_string_lossy().into_owned();

        let mut runner = RecordingRunner::new();
        create_project(&request(&target), &settings, &mut runner).unwrap();

        let create = &runner.invocations[0].command_line;
        assert!(create.contains(&format!("--link-to \"{}\"", settings.link_to)));
        assert!(!create.contains("--copy-from"));
    }

    #[test]
    fn test_create_parms_appended_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let target = fresh_target(&dir);

        let mut settings = settings();
        settings.create_parms = "--searchpath /opt/plugins".to_string();

        let mut runner = RecordingRunner::new();
        create_project(&request(&target), &settings, &mut runner).unwrap();

        assert!(runner.invocations[0]
            .command_line
            .ends_with("\"Example\" --searchpath /opt/plugins"));
    }
}
