use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand};
use globset::{Glob, GlobSet, GlobSetBuilder};
use handlebars::Handlebars;
use image::ImageFormat;
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use svg_atlas_core::prelude::*;
use svg_atlas_core::{RecordLayout, is_scene_path};
use tracing::{error, info, warn};
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(
    name = "svg-atlas",
    about = "Pack vector scene documents into texture atlas pages",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Show progress bars (disable with --progress false or --quiet)
    #[arg(long, default_value_t = true, action=ArgAction::Set, global=true, help_heading = "Logging/UX")]
    progress: bool,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging/UX"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pack inputs into atlas pages and write PNGs plus metadata
    Pack(PackArgs),
    /// Report collected/packed element counts per input without rendering
    Inspect(InspectArgs),
}

#[derive(Args, Debug, Clone)]
struct CommonArgs {
    // Input
    /// Input documents or directories, each optionally as `path[:explode][@scale]`
    #[arg(required = true, help_heading = "Input")]
    inputs: Vec<String>,
    /// Explode top-level groups of every input (per-input `:explode` also works)
    #[arg(long, default_value_t = false, help_heading = "Input")]
    explode: bool,
    /// Include patterns (glob). If set, only files matching any pattern are considered
    #[arg(long, help_heading = "Input")]
    include: Vec<String>,
    /// Exclude patterns (glob). Files matching any pattern will be ignored
    #[arg(long, help_heading = "Input")]
    exclude: Vec<String>,
    /// YAML config file; its values override the flags below
    #[arg(long, help_heading = "Input")]
    config: Option<PathBuf>,

    // Layout
    /// Scale applied to every input (multiplied with per-input `@scale`)
    #[arg(long, default_value_t = 1.0, help_heading = "Layout")]
    scale: f32,
    /// Maximum page width and height
    #[arg(long, default_value_t = 1024, help_heading = "Layout")]
    max_dimension: u32,
    /// Pixels between elements and around the page edges
    #[arg(long, default_value_t = 1, help_heading = "Layout")]
    border: u32,
    /// Power-of-two page sizes
    #[arg(long, default_value_t = false, help_heading = "Layout")]
    pow2: bool,

    // Algorithms
    /// Placer: maxrects | skyline
    #[arg(long, value_parser = ["maxrects", "skyline"], default_value = "maxrects", help_heading = "Algorithms")]
    placer: String,
    /// MaxRects heuristic: baf|bssf|blsf|bl|cp
    #[arg(long, default_value = "baf", help_heading = "Algorithms")]
    heuristic: String,
    /// Skyline heuristic: bl|minwaste
    #[arg(long, default_value = "bl", help_heading = "Algorithms")]
    skyline: String,
}

#[derive(Args, Debug, Clone)]
struct PackArgs {
    #[command(flatten)]
    common: CommonArgs,

    // Output
    /// Output directory
    #[arg(short, long, default_value = "out", help_heading = "Output")]
    out_dir: PathBuf,
    /// Atlas base name (files will be name.png/.json, or name_N.png for several pages)
    #[arg(short, long, default_value = "atlas", help_heading = "Output")]
    name: String,

    // Rendering
    /// Page clear color: `#RRGGBB`, `#RRGGBBAA` or `r,g,b[,a]`
    #[arg(long, default_value = "0,0,0,0", help_heading = "Rendering")]
    clear_color: String,
    /// Dilate element edges into the border after rasterization
    #[arg(long, default_value_t = true, action = ArgAction::Set, help_heading = "Rendering")]
    dilate: bool,
    /// Rasterization quality: non_antialiased | faster | better
    #[arg(long, default_value = "better", help_heading = "Rendering")]
    quality: String,
    /// Build pages in parallel (requires core feature `parallel`)
    #[arg(long, default_value_t = false, help_heading = "Rendering")]
    parallel: bool,

    // Export
    /// Metadata format
    #[arg(long, value_parser = ["json-array", "json", "json-hash", "plist", "libgdx", "template"], default_value = "json-array", help_heading = "Export")]
    format: String,
    /// Built-in template, used with --format template: phaser3 | list
    #[arg(long, help_heading = "Export")]
    engine: Option<String>,
    /// External template file (handlebars), used with --format template
    #[arg(long, help_heading = "Export")]
    template: Option<PathBuf>,
    /// Export atlas stats (JSON) to this file
    #[arg(long, help_heading = "Export")]
    export_stats: Option<PathBuf>,
    /// Print the merged configuration (after CLI/YAML) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
    /// Dry run: pack and render but do not write files
    #[arg(long, default_value_t = false, help_heading = "Export")]
    dry_run: bool,
}

#[derive(Args, Debug, Clone)]
struct InspectArgs {
    #[command(flatten)]
    common: CommonArgs,
    /// Print the report as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

/// One input after `path[:explode][@scale]` has been split apart.
#[derive(Debug, Clone, PartialEq)]
struct InputArg {
    path: PathBuf,
    explode: bool,
    scale: f32,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Pack(args) => run_pack(args, cli.progress && !cli.quiet),
        Commands::Inspect(args) => run_inspect(args),
    }
}

fn run_pack(args: &PackArgs, show_progress: bool) -> anyhow::Result<()> {
    let clear_color = parse_color(&args.clear_color)?;
    let quality = parse_named::<RenderingQuality>(&args.quality, "rendering quality")?;
    let cfg = resolve_config(&args.common, |cfg| {
        cfg.clear_color = clear_color;
        cfg.dilate_edges = args.dilate;
        cfg.quality = quality;
        cfg.parallel = args.parallel;
    })?;

    if args.print_config {
        match args.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&cfg)?),
            _ => println!("{}", serde_json::to_string_pretty(&cfg)?),
        }
        return Ok(());
    }

    let inputs = gather_inputs(&args.common)?;
    info!(count = inputs.len(), "collected input documents");
    let mut generator = new_generator(cfg, &inputs)?;

    let packing = spinner(show_progress, "packing");
    let start = Instant::now();
    let result = generator.generate();
    if let Some(s) = &packing {
        s.finish_and_clear();
    }
    let atlas = match result {
        Ok(atlas) => atlas,
        Err(e @ AtlasError::CapacityExceeded { .. }) => {
            report_capacity(&e);
            return Err(e.into());
        }
        Err(e) => return Err(e).context("generate atlas"),
    };
    let stats = atlas.stats();
    info!(
        pages = stats.num_pages,
        regions = stats.num_regions,
        occupancy = %format!("{:.2}%", stats.occupancy * 100.0),
        elapsed = %fmt_dur(start.elapsed()),
        "atlas packed"
    );

    let page_names = page_names(&args.name, atlas.pages().len());
    let meta = AtlasMeta::from_config(generator.config());
    let (metadata, extension) = render_metadata(args, &atlas, &meta, &page_names)?;

    if args.dry_run {
        println!("{}", stats.summary());
        return Ok(());
    }

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create out_dir {}", args.out_dir.display()))?;
    let bar = progress_bar(show_progress, atlas.pages().len() as u64, "writing");
    for (page, file) in atlas.pages().iter().zip(&page_names) {
        let path = args.out_dir.join(file);
        if let Some(b) = &bar {
            b.set_message(file.clone());
        }
        page.pixels()
            .save_with_format(&path, ImageFormat::Png)
            .with_context(|| format!("write {}", path.display()))?;
        if let Some(b) = &bar {
            b.inc(1);
        }
    }
    if let Some(b) = &bar {
        b.finish_and_clear();
    }

    let meta_path = args.out_dir.join(format!("{}.{}", args.name, extension));
    fs::write(&meta_path, metadata).with_context(|| format!("write {}", meta_path.display()))?;
    info!(?meta_path, pages = atlas.pages().len(), "atlas written");

    if let Some(stats_path) = &args.export_stats {
        let json = serde_json::to_string_pretty(&stats)?;
        fs::write(stats_path, json)
            .with_context(|| format!("write stats {}", stats_path.display()))?;
        info!(?stats_path, "stats written");
    }
    Ok(())
}

fn run_inspect(args: &InspectArgs) -> anyhow::Result<()> {
    let cfg = resolve_config(&args.common, |_| {})?;
    let max_dimension = cfg.max_dimension;
    let inputs = gather_inputs(&args.common)?;
    let mut generator = new_generator(cfg, &inputs)?;
    let report = generator.collect_stats().context("collect elements")?;

    let oversized: u32 = report.iter().map(|(_, s)| s.shortfall()).sum();
    if args.json {
        let rows: Vec<serde_json::Value> = report
            .iter()
            .map(|(source, s)| {
                serde_json::json!({
                    "source": source.to_string(),
                    "collected": s.collected,
                    "packed": s.packed,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        for (source, s) in &report {
            let mark = if s.is_complete() { "ok" } else { "OVERSIZED" };
            println!("{source}: collected {} packed {} {mark}", s.collected, s.packed);
        }
        let collected: u32 = report.iter().map(|(_, s)| s.collected).sum();
        println!(
            "total: {} inputs, {} elements, {} oversized",
            report.len(),
            collected,
            oversized
        );
    }
    if oversized > 0 {
        eprintln!("hint: increase --max-dimension or lower --scale");
        anyhow::bail!("{oversized} element(s) do not fit a {max_dimension}px page");
    }
    Ok(())
}

fn new_generator(
    cfg: GeneratorConfig,
    inputs: &[InputArg],
) -> anyhow::Result<AtlasGenerator<SceneLoader, SceneRasterizer>> {
    let mut generator = AtlasGenerator::new(cfg, SceneLoader::new(), SceneRasterizer)?;
    for input in inputs {
        let source = SourceId::new(input.path.to_string_lossy().replace('\\', "/"));
        if !generator.add_input(source, input.explode, input.scale)? {
            warn!(path = %input.path.display(), "duplicate input ignored");
        }
    }
    Ok(generator)
}

fn report_capacity(err: &AtlasError) {
    if let AtlasError::CapacityExceeded {
        source_id,
        collected,
        packed,
        max_dimension,
        scale,
    } = err
    {
        error!(
            source = %source_id,
            collected = *collected,
            packed = *packed,
            max_dimension = *max_dimension,
            scale = *scale,
            "elements do not fit a page"
        );
        eprintln!(
            "hint: increase --max-dimension (now {max_dimension}) or lower --scale (effective {scale}) so every element of '{source_id}' fits"
        );
    }
}

fn render_metadata(
    args: &PackArgs,
    atlas: &Atlas,
    meta: &AtlasMeta,
    page_names: &[String],
) -> anyhow::Result<(String, &'static str)> {
    Ok(match args.format.as_str() {
        "json-array" | "json" => (
            serde_json::to_string_pretty(&to_json_array(atlas, meta, page_names))?,
            "json",
        ),
        "json-hash" => (
            serde_json::to_string_pretty(&to_json_hash(atlas, meta, page_names))?,
            "json",
        ),
        "plist" => (to_plist(atlas, meta, page_names), "plist"),
        "libgdx" => (to_libgdx(atlas, meta, page_names), "atlas"),
        "template" => render_template(args, atlas, meta, page_names)?,
        other => anyhow::bail!("unknown metadata format: {}", other),
    })
}

fn render_template(
    args: &PackArgs,
    atlas: &Atlas,
    meta: &AtlasMeta,
    page_names: &[String],
) -> anyhow::Result<(String, &'static str)> {
    let from_file = match &args.template {
        Some(path) => Some(
            fs::read_to_string(path)
                .with_context(|| format!("read template {}", path.display()))?,
        ),
        None => None,
    };
    let (source, extension) = match (args.engine.as_deref(), &from_file) {
        (Some(engine), _) => match engine.to_ascii_lowercase().as_str() {
            "phaser3" => (include_str!("templates/phaser3.hbs"), "multiatlas.json"),
            "list" => (include_str!("templates/list.hbs"), "txt"),
            other => anyhow::bail!("unknown engine template: {}", other),
        },
        (None, Some(s)) => (s.as_str(), "template.txt"),
        (None, None) => (include_str!("templates/phaser3.hbs"), "multiatlas.json"),
    };

    let ctx = build_template_context(atlas, meta, page_names)?;
    let mut reg = Handlebars::new();
    reg.set_strict_mode(true);
    reg.register_template_string("tpl", source)?;
    Ok((reg.render("tpl", &ctx)?, extension))
}

#[derive(Serialize)]
struct TemplateSprite {
    name: String,
    frame: serde_json::Value,
    flipped_frame: serde_json::Value,
    uv: UvRect,
    z_order: i32,
    element_index: u32,
}

#[derive(Serialize)]
struct TemplatePage {
    index: usize,
    image: String,
    size: serde_json::Value,
    filter: FilterMode,
    sprites: Vec<TemplateSprite>,
}

#[derive(Serialize)]
struct TemplateContext {
    pages: Vec<TemplatePage>,
    meta: serde_json::Value,
}

fn build_template_context(
    atlas: &Atlas,
    meta: &AtlasMeta,
    page_names: &[String],
) -> anyhow::Result<TemplateContext> {
    let mut pages = Vec::with_capacity(atlas.pages().len());
    for (idx, page) in atlas.pages().iter().enumerate() {
        let image = page_names
            .get(idx)
            .cloned()
            .unwrap_or_else(|| format!("page{idx}.png"));
        let sprites = atlas
            .page_regions(idx)
            .map(|r| TemplateSprite {
                name: r.key.clone(),
                frame: serde_json::json!({"x": r.x(), "y": r.y(), "w": r.width(), "h": r.height()}),
                flipped_frame: serde_json::json!({"x": r.x(), "y": r.flipped_y(), "w": r.width(), "h": r.height()}),
                uv: r.uv(TextureAllocation::Exact),
                z_order: r.rect.z_order,
                element_index: r.rect.element_index,
            })
            .collect();
        pages.push(TemplatePage {
            index: page.index(),
            image,
            size: serde_json::json!({"w": page.width(), "h": page.height()}),
            filter: page.filter(),
            sprites,
        });
    }
    Ok(TemplateContext {
        pages,
        meta: serde_json::to_value(meta)?,
    })
}

fn page_names(name: &str, count: usize) -> Vec<String> {
    if count == 1 {
        vec![format!("{name}.png")]
    } else {
        (0..count).map(|i| format!("{name}_{i}.png")).collect()
    }
}

/// Builds the config from flags, then lets the YAML file override it.
fn resolve_config(
    common: &CommonArgs,
    extra: impl FnOnce(&mut GeneratorConfig),
) -> anyhow::Result<GeneratorConfig> {
    let mut cfg = GeneratorConfig::builder()
        .scale(common.scale)
        .max_dimension(common.max_dimension)
        .border(common.border)
        .pow2(common.pow2)
        .placer(parse_named(&common.placer, "placer")?)
        .mr_heuristic(parse_named(&common.heuristic, "maxrects heuristic")?)
        .skyline_heuristic(parse_named(&common.skyline, "skyline heuristic")?)
        .build();
    extra(&mut cfg);
    if let Some(path) = &common.config {
        let file =
            fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
        let y: YamlConfig = serde_yaml::from_str(&file)
            .with_context(|| format!("parse config {}", path.display()))?;
        cfg = y.into_generator_config(cfg)?;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn parse_named<T: std::str::FromStr>(s: &str, what: &str) -> anyhow::Result<T> {
    s.parse()
        .map_err(|_| anyhow::anyhow!("unknown {}: {}", what, s))
}

#[derive(Debug, Deserialize, Default)]
struct YamlConfig {
    scale: Option<f32>,
    max_dimension: Option<u32>,
    border: Option<u32>,
    pow2: Option<bool>,
    clear_color: Option<String>,
    dilate_edges: Option<bool>,
    quality: Option<String>,
    placer: Option<String>,
    heuristic: Option<String>,
    skyline: Option<String>,
    record_layout: Option<RecordLayout>,
    parallel: Option<bool>,
}

impl YamlConfig {
    fn into_generator_config(self, mut cfg: GeneratorConfig) -> anyhow::Result<GeneratorConfig> {
        if let Some(v) = self.scale {
            cfg.scale = v;
        }
        if let Some(v) = self.max_dimension {
            cfg.max_dimension = v;
        }
        if let Some(v) = self.border {
            cfg.border = v;
        }
        if let Some(v) = self.pow2 {
            cfg.pow2 = v;
        }
        if let Some(v) = self.clear_color {
            cfg.clear_color = parse_color(&v)?;
        }
        if let Some(v) = self.dilate_edges {
            cfg.dilate_edges = v;
        }
        if let Some(v) = self.quality {
            cfg.quality = parse_named(&v, "rendering quality")?;
        }
        if let Some(v) = self.placer {
            cfg.placer = parse_named(&v, "placer")?;
        }
        if let Some(v) = self.heuristic {
            cfg.mr_heuristic = parse_named(&v, "maxrects heuristic")?;
        }
        if let Some(v) = self.skyline {
            cfg.skyline_heuristic = parse_named(&v, "skyline heuristic")?;
        }
        if let Some(v) = self.record_layout {
            cfg.record_layout = v;
        }
        if let Some(v) = self.parallel {
            cfg.parallel = v;
        }
        Ok(cfg)
    }
}

/// Splits `path[:explode][@scale]`. A trailing `@...` that is not a number stays part of the path.
fn parse_input_arg(s: &str, default_explode: bool) -> anyhow::Result<InputArg> {
    let (rest, scale) = match s
        .rsplit_once('@')
        .and_then(|(p, sc)| sc.parse::<f32>().ok().map(|v| (p, v)))
    {
        Some((p, v)) => (p, v),
        None => (s, 1.0),
    };
    if !(scale.is_finite() && scale > 0.0) {
        anyhow::bail!("input scale must be > 0 in '{}'", s);
    }
    let (path, explode) = match rest.strip_suffix(":explode") {
        Some(p) => (p, true),
        None => (rest, default_explode),
    };
    if path.is_empty() {
        anyhow::bail!("empty input path in '{}'", s);
    }
    Ok(InputArg {
        path: PathBuf::from(path),
        explode,
        scale,
    })
}

fn gather_inputs(common: &CommonArgs) -> anyhow::Result<Vec<InputArg>> {
    let include = build_globset(&common.include)?;
    let exclude = build_globset(&common.exclude)?;
    let mut list = Vec::new();
    for raw in &common.inputs {
        let arg = parse_input_arg(raw, common.explode)?;
        if arg.path.is_file() {
            if !should_skip(&arg.path, include.as_ref(), exclude.as_ref()) {
                list.push(arg);
            }
        } else if arg.path.is_dir() {
            let walker = WalkDir::new(&arg.path).sort_by_file_name();
            for entry in walker.into_iter().filter_map(|e| e.ok()) {
                let p = entry.path();
                if p.is_file()
                    && is_scene_path(p)
                    && !should_skip(p, include.as_ref(), exclude.as_ref())
                {
                    list.push(InputArg {
                        path: p.to_path_buf(),
                        ..arg.clone()
                    });
                }
            }
        } else {
            anyhow::bail!("input not found: {}", arg.path.display());
        }
    }
    if list.is_empty() {
        anyhow::bail!("no scene documents (.json/.yaml/.yml) found in the given inputs");
    }
    Ok(list)
}

fn build_globset(patterns: &[String]) -> anyhow::Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut b = GlobSetBuilder::new();
    for pat in patterns {
        b.add(Glob::new(pat)?);
    }
    Ok(Some(b.build()?))
}

fn should_skip(p: &Path, include: Option<&GlobSet>, exclude: Option<&GlobSet>) -> bool {
    let s = p.to_string_lossy().replace('\\', "/");
    if let Some(ex) = exclude {
        if ex.is_match(&s) {
            return true;
        }
    }
    if let Some(inc) = include {
        if !inc.is_match(&s) {
            return true;
        }
    }
    false
}

/// Accepts `#RRGGBB`, `#RRGGBBAA` and `r,g,b[,a]`.
fn parse_color(s: &str) -> anyhow::Result<[u8; 4]> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        if !hex.is_ascii() {
            anyhow::bail!("invalid hex color '{}'", s);
        }
        let byte = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .with_context(|| format!("invalid hex color '{}'", s))
        };
        return match hex.len() {
            6 => Ok([byte(0)?, byte(2)?, byte(4)?, 255]),
            8 => Ok([byte(0)?, byte(2)?, byte(4)?, byte(6)?]),
            _ => anyhow::bail!("hex color must be #RRGGBB or #RRGGBBAA: '{}'", s),
        };
    }
    let parts = s
        .split(',')
        .map(|p| {
            p.trim()
                .parse::<u8>()
                .with_context(|| format!("invalid color component '{}' in '{}'", p, s))
        })
        .collect::<anyhow::Result<Vec<u8>>>()?;
    match parts.as_slice() {
        [r, g, b] => Ok([*r, *g, *b, 255]),
        [r, g, b, a] => Ok([*r, *g, *b, *a]),
        _ => anyhow::bail!("color must have 3 or 4 components: '{}'", s),
    }
}

fn spinner(enabled: bool, msg: &'static str) -> Option<ProgressBar> {
    if !enabled {
        return None;
    }
    let s = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}]") {
        s.set_style(style);
    }
    s.set_message(msg);
    s.enable_steady_tick(Duration::from_millis(100));
    Some(s)
}

fn progress_bar(enabled: bool, len: u64, verb: &str) -> Option<ProgressBar> {
    if !enabled {
        return None;
    }
    let b = ProgressBar::new(len);
    let template = format!("{{spinner:.green}} {verb} {{pos}}/{{len}} [{{elapsed_precise}}] {{wide_msg}}");
    if let Ok(style) = ProgressStyle::with_template(&template) {
        b.set_style(style);
    }
    Some(b)
}

fn fmt_dur(d: Duration) -> String {
    let ms = d.as_secs_f64() * 1000.0;
    if ms < 1000.0 {
        format!("{:.1} ms", ms)
    } else {
        format!("{:.2} s", ms / 1000.0)
    }
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_arg_suffixes() {
        let a = parse_input_arg("art/orc.json:explode@0.5", false).unwrap();
        assert_eq!(a.path, PathBuf::from("art/orc.json"));
        assert!(a.explode);
        assert_eq!(a.scale, 0.5);

        let b = parse_input_arg("art/orc.json", true).unwrap();
        assert!(b.explode);
        assert_eq!(b.scale, 1.0);

        let c = parse_input_arg("me@home/orc.yaml", false).unwrap();
        assert_eq!(c.path, PathBuf::from("me@home/orc.yaml"));

        assert!(parse_input_arg("orc.json@0", false).is_err());
        assert!(parse_input_arg(":explode", false).is_err());
    }

    #[test]
    fn colors() {
        assert_eq!(parse_color("#ff000080").unwrap(), [255, 0, 0, 128]);
        assert_eq!(parse_color("#00ff00").unwrap(), [0, 255, 0, 255]);
        assert_eq!(parse_color("1, 2, 3").unwrap(), [1, 2, 3, 255]);
        assert_eq!(parse_color("0,0,0,0").unwrap(), [0, 0, 0, 0]);
        assert!(parse_color("#abc").is_err());
        assert!(parse_color("1,2").is_err());
        assert!(parse_color("300,0,0").is_err());
    }

    #[test]
    fn page_file_names() {
        assert_eq!(page_names("atlas", 1), vec!["atlas.png"]);
        assert_eq!(page_names("atlas", 2), vec!["atlas_0.png", "atlas_1.png"]);
    }

    #[test]
    fn yaml_overrides_flags() {
        let y: YamlConfig =
            serde_yaml::from_str("max_dimension: 512\nplacer: skyline\nclear_color: '#ffffff'\n")
                .unwrap();
        let cfg = y.into_generator_config(GeneratorConfig::default()).unwrap();
        assert_eq!(cfg.max_dimension, 512);
        assert_eq!(cfg.placer, PlacerKind::Skyline);
        assert_eq!(cfg.clear_color, [255, 255, 255, 255]);
        assert_eq!(cfg.border, 1);
    }
}
