//! Command interpreter behind `POST /api/command`.
//!
//! A [`Shell`] owns a [`VirtualFs`] and a working directory. Each call to
//! [`Shell::execute`] runs one command line and reports the outcome as a
//! [`CommandResponse`]; failures never abort the shell, they become
//! `status = "error"` responses with the message as output.

pub mod fs;
pub mod tokenize;

use termweb_proto::CommandResponse;
use thiserror::Error;

use self::fs::{FsError, VirtualFs, VirtualPath, WriteMode};
use self::tokenize::{TokenizeError, tokenize};

const HELP_TEXT: &[&str] = &[
    "Available commands:",
    "  pwd",
    "  ls [path]",
    "  cd [path]",
    "  mkdir <name>...",
    "  touch <name>...",
    "  cat <file>...",
    "  echo <text> [> file | >> file]",
    "  clear",
    "  help",
];

#[derive(Debug, Error)]
pub enum ShellError {
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),
    #[error(transparent)]
    Fs(#[from] FsError),
    #[error("{0}: missing operand")]
    MissingOperand(&'static str),
    #[error("echo: missing file operand")]
    MissingFileOperand,
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
}

/// What a successful command asks the client to do.
#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    Print(String),
    Clear,
}

impl Outcome {
    fn silent() -> Self {
        Outcome::Print(String::new())
    }
}

#[derive(Debug, Default)]
pub struct Shell {
    fs: VirtualFs,
    cwd: VirtualPath,
}

impl Shell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cwd(&self) -> String {
        self.cwd.to_string()
    }

    /// Run one command line. The returned `cwd` reflects the directory after
    /// the command, whether or not it succeeded.
    pub fn execute(&mut self, input: &str) -> CommandResponse {
        match self.run(input) {
            Ok(Outcome::Print(output)) => CommandResponse::ok(output, self.cwd()),
            Ok(Outcome::Clear) => CommandResponse::cleared(self.cwd()),
            Err(err) => CommandResponse::error(err.to_string(), self.cwd()),
        }
    }

    fn run(&mut self, input: &str) -> Result<Outcome, ShellError> {
        let tokens = tokenize(input)?;
        let Some((name, args)) = tokens.split_first() else {
            return Ok(Outcome::silent());
        };

        match name.as_str() {
            "help" => Ok(Outcome::Print(HELP_TEXT.join("\n"))),
            "pwd" => Ok(Outcome::Print(self.cwd())),
            "ls" => self.ls(args.first().map(String::as_str)),
            "cd" => self.cd(args.first().map(String::as_str).unwrap_or("/")),
            "mkdir" => self.mkdir(args),
            "touch" => self.touch(args),
            "cat" => self.cat(args),
            "echo" => self.echo(args),
            "clear" => Ok(Outcome::Clear),
            other => Err(ShellError::UnknownCommand(other.to_string())),
        }
    }

    fn ls(&self, target: Option<&str>) -> Result<Outcome, ShellError> {
        let path = match target {
            Some(target) if !target.is_empty() => self.cwd.resolve(target),
            _ => self.cwd.clone(),
        };
        Ok(Outcome::Print(self.fs.list(&path)?))
    }

    fn cd(&mut self, target: &str) -> Result<Outcome, ShellError> {
        let path = self.cwd.resolve(target);
        if !self.fs.is_dir(&path)? {
            return Err(FsError::NotADirectory.into());
        }
        self.cwd = path;
        Ok(Outcome::silent())
    }

    fn mkdir(&mut self, args: &[String]) -> Result<Outcome, ShellError> {
        if args.is_empty() {
            return Err(ShellError::MissingOperand("mkdir"));
        }
        for arg in args {
            let path = self.cwd.resolve(arg);
            self.fs.mkdir(&path)?;
        }
        Ok(Outcome::silent())
    }

    fn touch(&mut self, args: &[String]) -> Result<Outcome, ShellError> {
        if args.is_empty() {
            return Err(ShellError::MissingOperand("touch"));
        }
        for arg in args {
            let path = self.cwd.resolve(arg);
            self.fs.touch(&path)?;
        }
        Ok(Outcome::silent())
    }

    fn cat(&self, args: &[String]) -> Result<Outcome, ShellError> {
        if args.is_empty() {
            return Err(ShellError::MissingOperand("cat"));
        }
        let parts = args
            .iter()
            .map(|arg| self.fs.read_file(&self.cwd.resolve(arg)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Outcome::Print(parts.join("\n")))
    }

    fn echo(&mut self, args: &[String]) -> Result<Outcome, ShellError> {
        let Some(pos) = args.iter().position(|arg| arg == ">" || arg == ">>") else {
            return Ok(Outcome::Print(args.join(" ")));
        };
        let target = args.get(pos + 1).ok_or(ShellError::MissingFileOperand)?;
        let mode = if args[pos] == ">>" {
            WriteMode::Append
        } else {
            WriteMode::Truncate
        };
        let content = args[..pos].join(" ");
        let path = self.cwd.resolve(target);
        self.fs.write_file(&path, &content, mode)?;
        Ok(Outcome::silent())
    }
}
