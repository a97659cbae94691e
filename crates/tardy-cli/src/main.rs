// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Tardy CLI - inspect how late variables are lowered.

mod help;
mod output;

use std::env;
use std::process;

use tardy_ast::{Expr, Span, Ty};
use tardy_lower::{
    compute_is_set_encoding, IsSetStrategy, LateKind, LateLowering, LateVariable, LoweringConfig,
    SoundnessMode, TargetConfig,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() {
    output::init();
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        help::print_usage();
        return;
    }

    match args[1].as_str() {
        "lower" => match LowerArgs::parse(&args[2..]) {
            Ok(opts) => {
                init_logging(opts.verbose);
                cmd_lower(&opts);
            }
            Err(message) => {
                output::report(&message, Some("run `tardy help` for the option list"));
                process::exit(1);
            }
        },
        "strategies" => cmd_strategies(),
        "help" | "--help" | "-h" => help::print_usage(),
        "version" | "--version" | "-V" => println!("tardy {}", help::VERSION),
        other => {
            output::report(&format!("unknown command: {}", other), None);
            help::print_usage();
            process::exit(1);
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

/// Options for `tardy lower`.
#[derive(Debug)]
struct LowerArgs {
    name: String,
    ty: Ty,
    kind: LateKind,
    is_final: bool,
    init: Option<i64>,
    mode: SoundnessMode,
    sentinel: bool,
    return_value: bool,
    json: bool,
    verbose: bool,
}

impl Default for LowerArgs {
    fn default() -> Self {
        Self {
            name: "x".to_string(),
            ty: Ty::non_nullable("int"),
            kind: LateKind::Field,
            is_final: false,
            init: None,
            mode: SoundnessMode::Sound,
            sentinel: false,
            return_value: false,
            json: false,
            verbose: false,
        }
    }
}

impl LowerArgs {
    fn parse(args: &[String]) -> Result<Self, String> {
        let mut opts = LowerArgs::default();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--final" => opts.is_final = true,
                "--sentinel" => opts.sentinel = true,
                "--return-value" => opts.return_value = true,
                "--json" => opts.json = true,
                "--verbose" | "-v" => opts.verbose = true,
                "--name" => opts.name = value_of(&mut iter, arg)?.to_string(),
                "--type" => {
                    let text = value_of(&mut iter, arg)?;
                    opts.ty = Ty::parse(text).ok_or_else(|| format!("invalid type `{}`", text))?;
                }
                "--kind" => {
                    opts.kind = match value_of(&mut iter, arg)? {
                        "field" => LateKind::Field,
                        "static" => LateKind::StaticField,
                        "local" => LateKind::Local,
                        other => {
                            return Err(format!(
                                "invalid kind `{}` (expected field, static or local)",
                                other
                            ))
                        }
                    };
                }
                "--init" => {
                    let text = value_of(&mut iter, arg)?;
                    let n = text
                        .parse::<i64>()
                        .map_err(|_| format!("--init expects an int literal, got `{}`", text))?;
                    opts.init = Some(n);
                }
                "--mode" => {
                    opts.mode = value_of(&mut iter, arg)?
                        .parse::<SoundnessMode>()
                        .map_err(|e| e.to_string())?;
                }
                other => return Err(format!("unknown option `{}`", other)),
            }
        }
        if opts.name.is_empty() {
            return Err("--name must not be empty".to_string());
        }
        Ok(opts)
    }

    fn variable(&self) -> LateVariable {
        let var = LateVariable::new(self.name.clone(), self.ty.clone(), self.kind).with_final(self.is_final);
        match self.init {
            Some(n) => var.with_initializer(Expr::int(n, Span::default())),
            None => var,
        }
    }
}

fn value_of<'a>(iter: &mut std::slice::Iter<'a, String>, flag: &str) -> Result<&'a str, String> {
    iter.next()
        .map(|s| s.as_str())
        .ok_or_else(|| format!("{} expects a value", flag))
}

fn cmd_lower(opts: &LowerArgs) {
    let target = TargetConfig::new(opts.mode, opts.sentinel);
    let config = LoweringConfig { setter_returns_value: opts.return_value, ..LoweringConfig::default() };
    let lowering = LateLowering::new(&target, config);
    debug!(?target, strategy = %lowering.strategy(), "target configured");
    let var = opts.variable();

    let lowered = match lowering.lower(&var) {
        Ok(lowered) => lowered,
        Err(e) => {
            output::report(&e.to_string(), None);
            process::exit(1);
        }
    };

    if opts.json {
        match serde_json::to_string_pretty(&lowered.plan) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                output::report(&format!("failed to serialize storage plan: {}", e), None);
                process::exit(1);
            }
        }
        return;
    }

    let plan = &lowered.plan;
    println!("{} {}", output::key("strategy"), lowering.strategy());
    println!("{} {}", output::key("encoding"), output::encoding(plan.encoding, &plan.encoding.to_string()));
    println!(
        "{} {} {} = {};",
        output::key("storage"),
        plan.storage_type,
        plan.storage_name,
        plan.initial_value_expr(&lowering.config().runtime, var.span)
    );
    if let Some(flag) = &plan.flag_name {
        println!("{} {} {} = false;", output::key("flag"), Ty::bool(), flag);
    }
    println!("{}", output::separator(40));
    println!("{}", output::section_header("get:"));
    print!("{}", indent(&lowered.getter.to_string()));
    println!("{}", output::section_header("set:"));
    print!("{}", indent(&lowered.setter.to_string()));
}

fn indent(text: &str) -> String {
    text.lines().map(|line| format!("  {}\n", line)).collect()
}

fn cmd_strategies() {
    let columns = ["int?", "int", "<T>"];
    print!("{:<22}", "");
    for label in columns {
        print!("{:<17}", label);
    }
    println!();
    for strategy in IsSetStrategy::ALL {
        print!("{:<22}", strategy.to_string());
        for ty in columns.iter().filter_map(|label| Ty::parse(label)) {
            let encoding = compute_is_set_encoding(&ty, strategy);
            // Pad before coloring; escape codes throw off width
            print!("{}", output::encoding(encoding, &format!("{:<17}", encoding.to_string())));
        }
        println!();
    }
}
