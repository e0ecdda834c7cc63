use crate::error::{Error, Result};
use crate::target::FlasherConfig;
use log::info;
use std::ffi::{OsStr, OsString};
use std::io;
use std::path::Path;
use std::process::Command;

/// A complete command line for the external flasher.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<OsString>,
}

impl Invocation {
    /// Builds `<program> -c <programmer> -p <part> -P <serial_port> -Uflash:w:<firmware>`.
    pub fn new(config: &FlasherConfig, serial_port: &Path, firmware: &OsStr) -> Self {
        let mut flash_op = OsString::from("-Uflash:w:");
        flash_op.push(firmware);

        Self {
            program: config.program.clone(),
            args: vec![
                "-c".into(),
                config.programmer.as_str().into(),
                "-p".into(),
                config.part.as_str().into(),
                "-P".into(),
                serial_port.as_os_str().to_owned(),
                flash_op,
            ],
        }
    }

    pub fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }
}

/// Hands control over to the flasher.
pub trait Dispatcher {
    /// Runs the invocation and returns its exit code. Implementations that replace the current
    /// process only ever return an error.
    fn dispatch(&mut self, invocation: &Invocation) -> Result<i32>;
}

/// Replaces the current process with the flasher on Unix; spawns it and waits elsewhere.
#[derive(Default)]
pub struct ExecDispatcher;

impl Dispatcher for ExecDispatcher {
    #[cfg(unix)]
    fn dispatch(&mut self, invocation: &Invocation) -> Result<i32> {
        use std::os::unix::process::CommandExt;

        info!("exec {} {:?}", invocation.program, invocation.args);
        let error = invocation.command().exec();
        Err(launch_error(&invocation.program, error))
    }

    #[cfg(not(unix))]
    fn dispatch(&mut self, invocation: &Invocation) -> Result<i32> {
        info!("spawn {} {:?}", invocation.program, invocation.args);
        let status = invocation
            .command()
            .status()
            .map_err(|error| launch_error(&invocation.program, error))?;
        Ok(status.code().unwrap_or(1))
    }
}

fn launch_error(program: &str, error: io::Error) -> Error {
    if error.kind() == io::ErrorKind::NotFound {
        Error::ExecutableNotFound(program.to_owned())
    } else {
        Error::Dispatch(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argument_template() {
        let invocation = Invocation::new(
            &FlasherConfig::default(),
            Path::new("/dev/ttyACM0"),
            OsStr::new("usbdev.hex"),
        );

        assert_eq!(invocation.program, "avrdude");
        assert_eq!(
            invocation.args,
            ["-c", "avr109", "-p", "m32u4", "-P", "/dev/ttyACM0", "-Uflash:w:usbdev.hex"]
                .iter()
                .map(OsString::from)
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn firmware_path_is_passed_through() {
        let invocation = Invocation::new(
            &FlasherConfig::default(),
            Path::new("/dev/ttyACM1"),
            OsStr::new("build/some dir/fw.hex"),
        );
        assert_eq!(
            invocation.args.last(),
            Some(&OsString::from("-Uflash:w:build/some dir/fw.hex"))
        );
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_firmware_is_passed_through() {
        use std::os::unix::ffi::{OsStrExt, OsStringExt};

        let invocation = Invocation::new(
            &FlasherConfig::default(),
            Path::new("/dev/ttyACM0"),
            OsStr::from_bytes(b"f\xff.hex"),
        );
        assert_eq!(
            invocation.args.last(),
            Some(&OsString::from_vec(b"-Uflash:w:f\xff.hex".to_vec()))
        );
    }

    #[test]
    fn missing_program() {
        let mut dispatcher = ExecDispatcher;
        let config = FlasherConfig {
            program: "bootkick-no-such-flasher".to_owned(),
            ..FlasherConfig::default()
        };
        let invocation = Invocation::new(&config, Path::new("/dev/null"), OsStr::new("x.hex"));

        match dispatcher.dispatch(&invocation) {
            Err(Error::ExecutableNotFound(program)) => {
                assert_eq!(program, "bootkick-no-such-flasher")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
