use std::process::{Command, Stdio};

pub fn check_for_samtools() {
    check_for_external_command_presence("samtools", "which samtools");
}

fn check_for_external_command_presence(executable_name: &str, testing_cmd: &str) {
    debug!("Checking for {} ..", executable_name);
    let status = Command::new("bash")
        .arg("-c")
        .arg(testing_cmd)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .unwrap_or_else(|_| panic!("Failed to test for presence of {}", executable_name));
    if !status.success() {
        error!(
            "Could not find an available {} executable on the PATH",
            executable_name
        );
        std::process::exit(1);
    }
}
