use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::anyhow;
use image::{ExtendedColorType, ImageFormat};
use rten_tensor::prelude::*;
use rten_tensor::NdTensorView;
use serde_json::json;

use rectplot::{Bounds, RectangleSet};

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum OutputFormat {
    /// Output a raster image of the plotted rectangles. The encoding is
    /// chosen from the output file extension.
    Image,

    /// Output the parsed rectangles and plot layout in JSON format.
    Json,
}

impl OutputFormat {
    /// Extension used when no output path is given.
    pub fn default_extension(&self) -> &'static str {
        match self {
            OutputFormat::Image => "png",
            OutputFormat::Json => "json",
        }
    }
}

/// Return the output path used when none is specified: the input path with
/// its extension replaced.
pub fn default_output_path(input: &Path, format: OutputFormat) -> PathBuf {
    input.with_extension(format.default_extension())
}

/// Determine the image encoding for `path` from its extension.
pub fn image_format_for_path(path: &Path) -> Result<ImageFormat, anyhow::Error> {
    let format = ImageFormat::from_path(path)
        .map_err(|_| anyhow!("Unrecognized image extension in \"{}\"", path.display()))?;
    match format {
        ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::WebP => Ok(format),
        other => Err(anyhow!(
            "Unsupported image format {:?} for \"{}\" (use png, jpeg or webp)",
            other,
            path.display()
        )),
    }
}

/// Return the path of the scratch file used while writing `path`.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = std::ffi::OsString::from(".");
    name.push(path.file_name().unwrap_or_default());
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write a file by calling `write` with a scratch file next to `path`, then
/// renaming the scratch file to `path`.
///
/// If any step fails the scratch file is removed and `path` is left
/// untouched.
pub fn write_file_atomic<F>(path: &Path, write: F) -> Result<(), anyhow::Error>
where
    F: FnOnce(&mut File) -> Result<(), anyhow::Error>,
{
    let tmp_path = temp_path(path);
    let result = File::create(&tmp_path)
        .map_err(anyhow::Error::from)
        .and_then(|mut file| {
            write(&mut file)?;
            file.sync_all()?;
            Ok(())
        })
        .and_then(|_| fs::rename(&tmp_path, path).map_err(anyhow::Error::from));

    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

/// Convert an HWC float tensor with values in the range [0, 1] to `Vec<u8>`
/// with values scaled to [0, 255].
fn image_from_tensor(tensor: NdTensorView<f32, 3>) -> Vec<u8> {
    tensor
        .iter()
        .map(|x| (x.clamp(0., 1.) * 255.0).round() as u8)
        .collect()
}

/// Convert a resolution in dots per inch to pixels per metre, the unit of
/// the PNG `pHYs` chunk.
fn pixels_per_metre(dpi: u32) -> u32 {
    (dpi as f64 / 0.0254).round() as u32
}

fn encode_png<W: Write>(
    writer: W,
    width: u32,
    height: u32,
    data: &[u8],
    dpi: u32,
) -> Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(writer, width, height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    let ppm = pixels_per_metre(dpi);
    encoder.set_pixel_dims(Some(png::PixelDimensions {
        xppu: ppm,
        yppu: ppm,
        unit: png::Unit::Meter,
    }));
    let mut writer = encoder.write_header()?;
    writer.write_image_data(data)?;
    writer.finish()
}

/// Write a CHW RGB image to `path` in the given format.
///
/// PNG files record `dpi` as their physical resolution.
pub fn write_image(
    path: &Path,
    img: NdTensorView<f32, 3>,
    format: ImageFormat,
    dpi: u32,
) -> Result<(), anyhow::Error> {
    let [chans, height, width] = img.shape();
    if chans != 3 {
        return Err(anyhow!("Expected RGB image, found {} channels", chans));
    }
    let data = image_from_tensor(img.permuted([1, 2, 0])); // CHW => HWC
    let (width, height) = (width as u32, height as u32);

    write_file_atomic(path, |file| {
        let mut writer = BufWriter::new(file);
        match format {
            ImageFormat::Png => encode_png(&mut writer, width, height, &data, dpi)?,
            _ => image::write_buffer_with_format(
                &mut writer,
                &data,
                width,
                height,
                ExtendedColorType::Rgb8,
                format,
            )?,
        }
        writer.flush()?;
        Ok(())
    })
}

fn bounds_json(bounds: Option<Bounds>) -> serde_json::Value {
    match bounds {
        Some(b) => json!({
            "x_min": b.x_min,
            "x_max": b.x_max,
            "y_min": b.y_min,
            "y_max": b.y_max,
        }),
        None => serde_json::Value::Null,
    }
}

/// Input data for [format_json_output].
pub struct FormatJsonArgs<'a> {
    pub input_path: &'a str,
    pub rects: &'a RectangleSet,
}

/// Format parsed rectangles and plot layout as JSON.
pub fn format_json_output(args: FormatJsonArgs) -> String {
    let FormatJsonArgs { input_path, rects } = args;
    let xy = |p: &rten_imageproc::Point| json!([p.x, p.y]);

    let items: Vec<_> = rects
        .iter()
        .enumerate()
        .map(|(index, rect)| {
            let center = rect.centroid();
            json!({
                "index": index,
                "vertices": rect.vertices().iter().map(xy).collect::<Vec<_>>(),
                "ordered": rect.sorted_vertices().iter().map(xy).collect::<Vec<_>>(),
                "centroid": [center.x, center.y],
            })
        })
        .collect();

    let json_data = json!({
        "input": input_path,
        "reported_area": rects.reported_area(),
        "bounds": bounds_json(rects.bounds()),
        "view": bounds_json(rects.view_bounds()),
        "rectangles": items,
    });
    serde_json::to_string_pretty(&json_data).expect("JSON formatting failed")
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::{Path, PathBuf};

    use image::{GenericImageView, ImageFormat};
    use rectplot::{Rectangle, RectangleSet};
    use rten_tensor::prelude::*;
    use rten_tensor::NdTensor;

    use super::{
        default_output_path, format_json_output, image_format_for_path, pixels_per_metre,
        temp_path, write_file_atomic, write_image, FormatJsonArgs, OutputFormat,
    };

    fn test_image() -> NdTensor<f32, 3> {
        let mut img = NdTensor::full([3, 8, 10], 1.0f32);
        img[[1, 2, 3]] = 0.;
        img
    }

    #[test]
    fn test_default_output_path() {
        struct Case<'a> {
            input: &'a str,
            format: OutputFormat,
            expected: &'a str,
        }

        let cases = [
            Case {
                input: "result.txt",
                format: OutputFormat::Image,
                expected: "result.png",
            },
            Case {
                input: "out/run.1.txt",
                format: OutputFormat::Image,
                expected: "out/run.1.png",
            },
            Case {
                input: "result",
                format: OutputFormat::Image,
                expected: "result.png",
            },
            Case {
                input: "result.txt",
                format: OutputFormat::Json,
                expected: "result.json",
            },
        ];

        for Case {
            input,
            format,
            expected,
        } in cases
        {
            assert_eq!(
                default_output_path(Path::new(input), format),
                PathBuf::from(expected)
            );
        }
    }

    #[test]
    fn test_image_format_for_path() {
        assert_eq!(
            image_format_for_path(Path::new("a.png")).unwrap(),
            ImageFormat::Png
        );
        assert_eq!(
            image_format_for_path(Path::new("a.JPG")).unwrap(),
            ImageFormat::Jpeg
        );
        assert_eq!(
            image_format_for_path(Path::new("a.webp")).unwrap(),
            ImageFormat::WebP
        );
        assert!(image_format_for_path(Path::new("a.gif")).is_err());
        assert!(image_format_for_path(Path::new("a.txt")).is_err());
        assert!(image_format_for_path(Path::new("a")).is_err());
    }

    #[test]
    fn test_temp_path() {
        assert_eq!(
            temp_path(Path::new("out/plot.png")),
            PathBuf::from("out/.plot.png.tmp")
        );
    }

    #[test]
    fn test_pixels_per_metre() {
        assert_eq!(pixels_per_metre(300), 11811);
        assert_eq!(pixels_per_metre(72), 2835);
    }

    #[test]
    fn test_write_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plot.png");

        write_image(&path, test_image().view(), ImageFormat::Png, 300).unwrap();

        let decoded = image::open(&path).unwrap();
        assert_eq!(decoded.dimensions(), (10, 8));
        assert_eq!(decoded.get_pixel(0, 0).0, [255, 255, 255, 255]);
        assert_eq!(decoded.get_pixel(3, 2).0, [255, 0, 255, 255]);

        let decoder = png::Decoder::new(fs::File::open(&path).unwrap());
        let reader = decoder.read_info().unwrap();
        let dims = reader.info().pixel_dims.unwrap();
        assert_eq!((dims.xppu, dims.yppu), (11811, 11811));
        assert_eq!(dims.unit, png::Unit::Meter);

        assert!(!dir.path().join(".plot.png.tmp").exists());
    }

    #[test]
    fn test_write_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plot.jpg");

        write_image(&path, test_image().view(), ImageFormat::Jpeg, 300).unwrap();

        let decoded = image::open(&path).unwrap();
        assert_eq!(decoded.dimensions(), (10, 8));
    }

    #[test]
    fn test_write_file_atomic_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plot.png");

        let result = write_file_atomic(&path, |_file| Err(anyhow::anyhow!("encoder failed")));

        assert!(result.is_err());
        assert!(!path.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_format_json_output() {
        let rects = RectangleSet::new(
            vec![
                Rectangle::from_xy([(0, 0), (0, 2), (2, 2), (2, 0)]),
                Rectangle::from_xy([(3, 0), (3, 1), (4, 1), (4, 0)]),
            ],
            Some("10".to_string()),
        );

        let json = format_json_output(FormatJsonArgs {
            input_path: "result.txt",
            rects: &rects,
        });
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["input"], "result.txt");
        assert_eq!(value["reported_area"], 10);
        assert_eq!(value["view"]["x_min"], -1);
        assert_eq!(value["view"]["x_max"], 5);
        assert_eq!(value["view"]["y_min"], -1);
        assert_eq!(value["view"]["y_max"], 3);

        let items = value["rectangles"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1]["index"], 1);
        assert_eq!(items[1]["centroid"], serde_json::json!([3.5, 0.5]));
        assert_eq!(
            items[0]["ordered"],
            serde_json::json!([[0, 2], [2, 2], [2, 0], [0, 0]])
        );
    }
}
