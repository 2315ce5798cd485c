//! Gravity model files in the GeographicLib layout.
//!
//! A model `<name>` is two files in the data directory:
//!
//! * `<name>.egm`, a text file starting with [`HEADER`] followed by
//!   `Key value` lines (`#` starts a comment). `ModelRadius` (m), `ModelMass`
//!   (GM, m^3/s^2) and `ID` are required.
//! * `<name>.egm.cof`, binary: the 8 byte `ID`, then `N` and `M` as i32, then
//!   the cosine coefficients column by column (`C[m][m..=N]` for `m = 0..=M`),
//!   then the sine coefficients the same way starting at `m = 1`. A second,
//!   correction set follows in published files and is not read here.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use byteorder::{BigEndian, ByteOrder, LittleEndian, ReadBytesExt, WriteBytesExt};
use spherical_harmonics::SphericalHarmonicsErrors;

use crate::GravityErrors;
use crate::config::GravityConfig;

pub const HEADER: &str = "GEOGRAPHICLIB-GravityModel-1";
pub const ID_LENGTH: usize = 8;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Normalization {
    #[default]
    Full,
    Schmidt,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Endianness {
    #[default]
    Little,
    Big,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelMetadata {
    pub name: Option<String>,
    pub description: Option<String>,
    pub release_date: Option<String>,
    pub id: String,
    /// reference radius of the expansion, m
    pub radius: f64,
    /// gravitational parameter GM, m^3/s^2
    pub mu: f64,
    /// rad/s, informational only since no centrifugal term is applied
    pub angular_velocity: Option<f64>,
    pub normalization: Normalization,
    pub endianness: Endianness,
}

impl ModelMetadata {
    pub fn new(id: &str, radius: f64, mu: f64) -> Self {
        Self {
            name: None,
            description: None,
            release_date: None,
            id: id.to_string(),
            radius,
            mu,
            angular_velocity: None,
            normalization: Normalization::Full,
            endianness: Endianness::Little,
        }
    }

    pub fn parse(contents: &str, path: &Path) -> Result<Self, GravityErrors> {
        let mut lines = contents.lines();
        if lines.next().map(str::trim) != Some(HEADER) {
            return Err(GravityErrors::InvalidHeader {
                path: path.to_path_buf(),
                expected: HEADER,
            });
        }

        let mut metadata = Self::new("", f64::NAN, f64::NAN);
        let mut id = None;
        let mut radius = None;
        let mut mu = None;

        for line in lines {
            let line = match line.split_once('#') {
                Some((content, _comment)) => content,
                None => line,
            }
            .trim();
            if line.is_empty() {
                continue;
            }
            let (key, value) = match line.split_once(char::is_whitespace) {
                Some((key, value)) => (key, value.trim()),
                None => (line, ""),
            };

            match key {
                "Name" => metadata.name = Some(value.to_string()),
                "Description" => metadata.description = Some(value.to_string()),
                "ReleaseDate" => metadata.release_date = Some(value.to_string()),
                "ID" => id = Some(value.to_string()),
                "ModelRadius" => radius = Some(parse_f64(path, key, value)?),
                "ModelMass" => mu = Some(parse_f64(path, key, value)?),
                "AngularVelocity" => {
                    metadata.angular_velocity = Some(parse_f64(path, key, value)?)
                }
                "Normalization" => {
                    metadata.normalization = match value.to_ascii_lowercase().as_str() {
                        "full" => Normalization::Full,
                        "schmidt" => Normalization::Schmidt,
                        _ => {
                            return Err(GravityErrors::UnsupportedNormalization {
                                path: path.to_path_buf(),
                                value: value.to_string(),
                            });
                        }
                    }
                }
                "ByteOrder" => {
                    metadata.endianness = match value.to_ascii_lowercase().as_str() {
                        "little" => Endianness::Little,
                        "big" => Endianness::Big,
                        _ => return Err(invalid_value(path, key, value)),
                    }
                }
                // reference ellipsoid and provenance, not needed for the potential
                "Publisher" | "URL" | "ConversionDate" | "DataVersion" | "ReferenceRadius"
                | "ReferenceMass" | "Flattening" | "DynamicalFormFactor" | "HeightOffset" => {}
                _ => log::warn!("{}: ignoring unknown key '{}'", path.display(), key),
            }
        }

        let missing = |key| GravityErrors::MissingKey {
            path: path.to_path_buf(),
            key,
        };
        metadata.id = id.ok_or_else(|| missing("ID"))?;
        metadata.radius = radius.ok_or_else(|| missing("ModelRadius"))?;
        metadata.mu = mu.ok_or_else(|| missing("ModelMass"))?;

        if metadata.id.len() != ID_LENGTH {
            return Err(invalid_value(path, "ID", &metadata.id));
        }
        if !(metadata.radius > 0.0) {
            return Err(invalid_value(path, "ModelRadius", &metadata.radius.to_string()));
        }

        Ok(metadata)
    }

    /// Renders the `.egm` file contents.
    pub fn to_egm(&self) -> String {
        let mut lines = vec![HEADER.to_string()];
        if let Some(name) = &self.name {
            lines.push(format!("Name            {}", name));
        }
        if let Some(description) = &self.description {
            lines.push(format!("Description     {}", description));
        }
        if let Some(release_date) = &self.release_date {
            lines.push(format!("ReleaseDate     {}", release_date));
        }
        lines.push(format!("ModelRadius     {}", self.radius));
        lines.push(format!("ModelMass       {}", self.mu));
        if let Some(angular_velocity) = self.angular_velocity {
            lines.push(format!("AngularVelocity {}", angular_velocity));
        }
        let normalization = match self.normalization {
            Normalization::Full => "full",
            Normalization::Schmidt => "schmidt",
        };
        lines.push(format!("Normalization   {}", normalization));
        let byte_order = match self.endianness {
            Endianness::Little => "little",
            Endianness::Big => "big",
        };
        lines.push(format!("ByteOrder       {}", byte_order));
        lines.push(format!("ID              {}", self.id));
        lines.join("\n") + "\n"
    }
}

/// A truncated set of fully normalized coefficients, indexed `c[n][m]`.
#[derive(Debug, Clone, PartialEq)]
pub struct GravityCoefficients {
    pub model: String,
    pub metadata: ModelMetadata,
    /// directory the model was read from, `None` for tables built in memory
    pub data_dir: Option<PathBuf>,
    pub degree: usize,
    pub order: usize,
    pub c: Vec<Vec<f64>>,
    pub s: Vec<Vec<f64>>,
}

impl GravityCoefficients {
    pub fn new(
        model: &str,
        metadata: ModelMetadata,
        c: Vec<Vec<f64>>,
        s: Vec<Vec<f64>>,
    ) -> Result<Self, GravityErrors> {
        let degree = c.len().checked_sub(1).ok_or(GravityErrors::MalformedTable)?;
        let order = c[degree].len().checked_sub(1).ok_or(GravityErrors::MalformedTable)?;
        let triangular = |table: &Vec<Vec<f64>>| {
            table.len() == degree + 1
                && table
                    .iter()
                    .enumerate()
                    .all(|(n, row)| row.len() == n.min(order) + 1)
        };
        if order > degree || !triangular(&c) || !triangular(&s) {
            return Err(GravityErrors::MalformedTable);
        }

        Ok(Self {
            model: model.to_string(),
            metadata,
            data_dir: None,
            degree,
            order,
            c,
            s,
        })
    }

    /// Reads `model` from the configured directory, keeping terms up to
    /// `degree` and `order`. Either exceeding what the file holds is an error.
    pub fn load(
        model: &str,
        config: &GravityConfig,
        degree: usize,
        order: usize,
    ) -> Result<Self, GravityErrors> {
        if order > degree {
            return Err(SphericalHarmonicsErrors::OrderGreaterThanDegree { degree, order }.into());
        }

        let model_path = config.model_path(model);
        let contents = std::fs::read_to_string(&model_path)
            .map_err(|e| open_error(model, &model_path, e))?;
        let metadata = ModelMetadata::parse(&contents, &model_path)?;

        let coefficient_path = config.coefficient_path(model);
        let file = File::open(&coefficient_path)
            .map_err(|e| open_error(model, &coefficient_path, e))?;
        let mut reader = BufReader::new(file);

        log::debug!(
            "loading gravity model '{}' to degree {} order {} from {}",
            model,
            degree,
            order,
            config.data_dir.display()
        );

        let source = CoefficientSource {
            path: &coefficient_path,
            model,
            id: &metadata.id,
        };
        let (mut c, mut s) = match metadata.endianness {
            Endianness::Little => {
                read_coefficients::<LittleEndian, _>(&mut reader, &source, degree, order)?
            }
            Endianness::Big => {
                read_coefficients::<BigEndian, _>(&mut reader, &source, degree, order)?
            }
        };

        if metadata.normalization == Normalization::Schmidt {
            for n in 0..=degree {
                let k = (2.0 * n as f64 + 1.0).sqrt();
                c[n].iter_mut().for_each(|v| *v /= k);
                s[n].iter_mut().for_each(|v| *v /= k);
            }
        }

        Ok(Self {
            model: model.to_string(),
            metadata,
            data_dir: Some(config.data_dir.clone()),
            degree,
            order,
            c,
            s,
        })
    }

    /// Writes the table as a model named `self.model` into the configured directory.
    /// Coefficients are written fully normalized with an empty correction set.
    pub fn save(&self, config: &GravityConfig) -> Result<(), GravityErrors> {
        if self.metadata.id.len() != ID_LENGTH {
            return Err(invalid_value(
                &config.model_path(&self.model),
                "ID",
                &self.metadata.id,
            ));
        }

        let mut metadata = self.metadata.clone();
        metadata.normalization = Normalization::Full;

        let model_path = config.model_path(&self.model);
        std::fs::write(&model_path, metadata.to_egm()).map_err(|source| GravityErrors::Io {
            path: model_path.clone(),
            source,
        })?;

        let coefficient_path = config.coefficient_path(&self.model);
        let io_error = |source| GravityErrors::Io {
            path: coefficient_path.clone(),
            source,
        };
        let file = File::create(&coefficient_path).map_err(io_error)?;
        let mut writer = BufWriter::new(file);
        match metadata.endianness {
            Endianness::Little => self.write_coefficients::<LittleEndian, _>(&mut writer),
            Endianness::Big => self.write_coefficients::<BigEndian, _>(&mut writer),
        }
        .and_then(|_| writer.flush())
        .map_err(io_error)
    }

    fn write_coefficients<B: ByteOrder, W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(self.metadata.id.as_bytes())?;
        writer.write_i32::<B>(self.degree as i32)?;
        writer.write_i32::<B>(self.order as i32)?;
        for m in 0..=self.order {
            for n in m..=self.degree {
                writer.write_f64::<B>(self.c[n][m])?;
            }
        }
        for m in 1..=self.order {
            for n in m..=self.degree {
                writer.write_f64::<B>(self.s[n][m])?;
            }
        }
        // no correction coefficients
        writer.write_i32::<B>(-1)?;
        writer.write_i32::<B>(-1)?;
        Ok(())
    }
}

struct CoefficientSource<'a> {
    path: &'a Path,
    model: &'a str,
    id: &'a str,
}

fn read_coefficients<B: ByteOrder, R: Read + Seek>(
    reader: &mut R,
    source: &CoefficientSource,
    degree: usize,
    order: usize,
) -> Result<(Vec<Vec<f64>>, Vec<Vec<f64>>), GravityErrors> {
    let read_error = |e: std::io::Error| match e.kind() {
        std::io::ErrorKind::UnexpectedEof => GravityErrors::UnexpectedEof {
            path: source.path.to_path_buf(),
        },
        _ => GravityErrors::Io {
            path: source.path.to_path_buf(),
            source: e,
        },
    };

    let mut file_id = [0u8; ID_LENGTH];
    reader.read_exact(&mut file_id).map_err(read_error)?;
    let found = String::from_utf8_lossy(&file_id);
    if found != source.id {
        return Err(GravityErrors::IdMismatch {
            path: source.path.to_path_buf(),
            expected: source.id.to_string(),
            found: found.into_owned(),
        });
    }

    let max_degree = reader.read_i32::<B>().map_err(read_error)?;
    let max_order = reader.read_i32::<B>().map_err(read_error)?;
    let valid = (max_degree >= max_order && max_order >= 0) || (max_degree == -1 && max_order == -1);
    if !valid {
        return Err(GravityErrors::InvalidDegreeOrder {
            path: source.path.to_path_buf(),
            degree: max_degree,
            order: max_order,
        });
    }
    if degree as i64 > max_degree as i64 || order as i64 > max_order as i64 {
        return Err(GravityErrors::DegreeOutOfRange {
            model: source.model.to_string(),
            degree,
            order,
            max_degree,
            max_order,
        });
    }
    // both are non-negative past the range check
    let (max_degree, max_order) = (max_degree as usize, max_order as usize);

    let mut c: Vec<Vec<f64>> = (0..=degree).map(|n| vec![0.0; n.min(order) + 1]).collect();
    let mut s = c.clone();
    let skip = |reader: &mut R, count: usize| {
        reader
            .seek(SeekFrom::Current((count * std::mem::size_of::<f64>()) as i64))
            .map(|_| ())
    };

    for m in 0..=order {
        for n in m..=degree {
            c[n][m] = reader.read_f64::<B>().map_err(read_error)?;
        }
        skip(reader, max_degree - degree).map_err(read_error)?;
    }
    let remaining: usize = (order + 1..=max_order).map(|m| max_degree + 1 - m).sum();
    skip(reader, remaining).map_err(read_error)?;

    for m in 1..=order {
        for n in m..=degree {
            s[n][m] = reader.read_f64::<B>().map_err(read_error)?;
        }
        skip(reader, max_degree - degree).map_err(read_error)?;
    }

    Ok((c, s))
}

fn open_error(model: &str, path: &Path, e: std::io::Error) -> GravityErrors {
    match e.kind() {
        std::io::ErrorKind::NotFound => GravityErrors::ModelNotFound {
            model: model.to_string(),
            path: path.to_path_buf(),
        },
        _ => GravityErrors::Io {
            path: path.to_path_buf(),
            source: e,
        },
    }
}

fn invalid_value(path: &Path, key: &str, value: &str) -> GravityErrors {
    GravityErrors::InvalidValue {
        path: path.to_path_buf(),
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn parse_f64(path: &Path, key: &str, value: &str) -> Result<f64, GravityErrors> {
    value
        .parse::<f64>()
        .map_err(|_| invalid_value(path, key, value))
}
