//! Render the arc spiral into a PNG image
use spiral::*;
use std::{env, fs::File, io::BufWriter};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

type Error = Box<dyn std::error::Error>;

#[derive(Debug)]
struct Args {
    config: Config,
    output_file: String,
}

impl Args {
    fn parse() -> Result<Args, Error> {
        let mut config = None;
        let mut stroke = None;
        let mut fill = None;
        let mut width = None;
        let mut iterations = None;
        let mut output_file = None;
        let mut args = env::args();
        let cmd = args.next().unwrap_or_else(|| "spiral".to_owned());
        while let Some(arg) = args.next() {
            match arg.as_ref() {
                "-h" => {
                    output_file = None;
                    break;
                }
                "-c" => {
                    let path = args.next().ok_or("-c requires argument")?;
                    config = Some(Config::from_path(path)?);
                }
                "-n" => {
                    let value = args.next().ok_or("-n requires argument")?;
                    iterations = Some(value.parse()?);
                }
                "-s" => {
                    let value = args.next().ok_or("-s requires argument")?;
                    width = Some(value.parse()?);
                }
                "-fg" => {
                    let color = args
                        .next()
                        .ok_or("-fg requires color #rrggbb(aa) argument")?
                        .parse()?;
                    stroke = Some(color);
                }
                "-fill" => {
                    let color = args
                        .next()
                        .ok_or("-fill requires color #rrggbb(aa) argument")?
                        .parse()?;
                    fill = Some(color);
                }
                _ if output_file.is_none() => output_file = Some(arg),
                _ => return Err("unexpected positional argument".into()),
            }
        }
        let Some(output_file) = output_file else {
            eprintln!("Renders spiral made of circular arcs into a PNG image");
            eprintln!("\nUSAGE:");
            eprintln!(
                "    {} [-c <config.json>] [-n <iterations>] [-s <stroke_width>] [-fg <color>] [-fill <color>] <out.png>",
                cmd
            );
            eprintln!("\nARGS:");
            eprintln!("    -c <config.json>   spiral, style and rasterizer configuration");
            eprintln!("    -n <iterations>    number of spiral iterations");
            eprintln!("    -s <stroke_width>  width of the stroke");
            eprintln!("    -fg <color>        stroke color (default: #ffffff)");
            eprintln!("    -fill <color>      fill color");
            eprintln!("    <out.png>          rendered image ('-' means stdout)");
            std::process::exit(1);
        };

        let mut config = config.unwrap_or_else(|| Config {
            style: RenderStyle {
                stroke: Some(Rgba::WHITE),
                ..Default::default()
            },
            ..Default::default()
        });
        if let Some(iterations) = iterations {
            config.spiral.iterations = iterations;
        }
        if let Some(width) = width {
            config.style.stroke_width = width;
        }
        if stroke.is_some() {
            config.style.stroke = stroke;
        }
        if fill.is_some() {
            config.style.fill = fill;
        }
        Ok(Args {
            config,
            output_file,
        })
    }
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_span_events(FmtSpan::CLOSE)
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse()?;
    tracing::debug!("[config] {:?}", args.config);

    let path = tracing::debug_span!("[spiral]").in_scope(|| args.config.spiral.build());
    let image = tracing::debug_span!("[render]")
        .in_scope(|| args.config.rasterizer.rasterize(path, &args.config.style))?;

    let _save = tracing::debug_span!("[save]").entered();
    if args.output_file != "-" {
        image.write_png(BufWriter::new(File::create(args.output_file)?))?;
    } else {
        image.write_png(std::io::stdout().lock())?;
    }

    Ok(())
}
