use std::error::Error;
use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use jclass::class_file::{ClassFile, MemberInfo};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(value_name = "CLASSES", required = true)]
    class_file: Vec<PathBuf>,

    /// Print line number tables
    #[arg(short, long)]
    line: bool,

    /// Show only public classes and members
    #[arg(long)]
    public: bool,

    /// Show all classes and members
    #[arg(long)]
    private: bool,

    /// Print code structure (stack, locals, exception handlers)
    #[arg(short = 'c', long)]
    code: bool,

    /// Print the constant pool
    #[arg(short, long)]
    verbose: bool,

    /// List the symbols this class provides
    #[arg(long)]
    provides: bool,

    /// List the external symbols this class requires
    #[arg(long)]
    requires: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut stdout = std::io::stdout();
    for path in &args.class_file {
        if !jclass::is_class_file(path) {
            return Err(format!("{} is not a Java class file", path.display()).into());
        }
        let class = jclass::unpack_classfile(path)?;
        let output = output_class(&class, &args)?;
        stdout.write_all(&output)?;
    }
    Ok(())
}

fn visible(member: &MemberInfo, args: &Args) -> bool {
    if args.private {
        return true;
    }
    if args.public {
        return member.is_public();
    }
    // default is package level and up
    !member.is_private()
}

fn output_class(class: &ClassFile, args: &Args) -> Result<Vec<u8>, Box<dyn Error>> {
    let mut out = Vec::new();
    let cpool = &class.cpool;

    if let Some(sourcefile) = class.get_sourcefile()? {
        writeln!(out, "Compiled from \"{sourcefile}\"")?;
    }
    writeln!(out, "{} {{", class.pretty_descriptor()?)?;
    for field in &class.fields {
        if !visible(field, args) {
            continue;
        }
        writeln!(out, "    {};", field.pretty_descriptor(cpool)?)?;
    }
    for method in &class.methods {
        if !visible(method, args) {
            continue;
        }
        writeln!(out, "    {};", method.pretty_descriptor(cpool)?)?;
        if args.code || args.line {
            if let Some(code) = method.get_code(cpool)? {
                if args.code {
                    writeln!(
                        out,
                        "      Code: stack={}, locals={}, {} bytes",
                        code.max_stack,
                        code.max_locals,
                        code.code.len()
                    )?;
                    for handler in &code.exceptions {
                        writeln!(
                            out,
                            "        catch {} [{}, {}) -> {}",
                            handler.pretty_catch_type(),
                            handler.start_pc,
                            handler.end_pc,
                            handler.handler_pc
                        )?;
                    }
                }
                if args.line {
                    let table = code.get_linenumbertable()?;
                    if !table.is_empty() {
                        writeln!(out, "      LineNumberTable:")?;
                        for row in table {
                            writeln!(out, "        line {}: {}", row.line_number, row.start_pc)?;
                        }
                    }
                }
            }
        }
    }
    writeln!(out, "}}")?;

    if args.verbose {
        writeln!(out, "Constant pool:")?;
        for (i, _) in cpool.entries() {
            if let Some((tag, value)) = cpool.pretty_const(i)? {
                writeln!(out, "  #{i} = {tag:<16} {value}")?;
            }
        }
        writeln!(
            out,
            "  platform: {}",
            class.get_platform().unwrap_or("unknown")
        )?;
    }

    if args.provides {
        writeln!(out, "Provides:")?;
        for name in class.get_provides(args.private)? {
            writeln!(out, "  {name}")?;
        }
    }
    if args.requires {
        writeln!(out, "Requires:")?;
        for name in class.get_requires()? {
            writeln!(out, "  {name}")?;
        }
    }

    Ok(out)
}
