//! 外部命令执行
//!
//! 后端不直接调用 `std::process`，而是通过 [`CommandRunner`] 执行命令，
//! 测试中可以替换为脚本化的实现。

use super::types::CommandOutput;
use crate::error::{Error, Result};

pub trait CommandRunner {
    /// 同步执行 `program args...`，返回 stdout、stderr 和退出码。
    /// 非零退出码不视为错误，由调用方判断。
    fn run(&self, program: &str, args: &[String], env: &[(&str, &str)]) -> Result<CommandOutput>;
}

/// 基于 duct 的真实进程执行器
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String], env: &[(&str, &str)]) -> Result<CommandOutput> {
        log::info!("running: {} {}", program, args.join(" "));

        let mut expr = duct::cmd(program, args);
        for (key, value) in env {
            expr = expr.env(*key, *value);
        }
        let output = expr.stdout_capture().stderr_capture().unchecked().run()?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            code: output.status.code(),
        })
    }
}

/// 非零退出时转换为 `Error::CommandFailed`
pub fn check_status(program: &str, output: CommandOutput) -> Result<CommandOutput> {
    if output.success() {
        return Ok(output);
    }
    Err(Error::CommandFailed {
        program: program.to_string(),
        code: output.code,
        output: output.combined_output(),
    })
}

/// 在 PATH 中查找可执行文件
pub fn binary_available(name: &str) -> bool {
    which::which(name).is_ok()
}
