use thiserror::Error;

#[derive(Debug, Error)]
pub enum SphericalHarmonicsErrors {
    #[error("order ({order}) must be less than or equal to degree ({degree})")]
    OrderGreaterThanDegree { degree: usize, order: usize },
    #[error("coefficient table does not cover degree {degree} and order {order}")]
    CoefficientTableTooSmall { degree: usize, order: usize },
}

/// Evaluates a fully normalized spherical harmonic expansion of a potential
///
/// U = mu/r * sum_{n,m} (re/r)^n * Pnm(sin(lat)) * (Cnm cos(m lon) + Snm sin(m lon))
///
/// using the Cunningham V/W recursion, so no latitude or longitude is ever
/// formed and the poles are not singular. Coefficients are indexed `c[n][m]`
/// and are expected in the geodesy (4pi) normalization without the
/// Condon-Shortley phase. `c[0][0]` carries the central term, so a table with
/// only `c[0][0] = 1.0` is point mass gravity.
#[derive(Clone, Debug, Default)]
pub struct SphericalHarmonics {
    degree: usize,
    order: usize,
    v: Vec<Vec<f64>>,
    w: Vec<Vec<f64>>,
}

impl SphericalHarmonics {
    pub fn new(degree: usize, order: usize) -> Result<Self, SphericalHarmonicsErrors> {
        if order > degree {
            return Err(SphericalHarmonicsErrors::OrderGreaterThanDegree { degree, order });
        }
        // +1 since the gradient of degree n needs V[n+1][m+1]
        let size = degree + 2;
        Ok(Self {
            degree,
            order,
            v: vec![vec![0.0; size]; size],
            w: vec![vec![0.0; size]; size],
        })
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn order(&self) -> usize {
        self.order
    }

    /// returns the gradient of U
    pub fn calculate(
        &mut self,
        r: [f64; 3],
        c: &[Vec<f64>],
        s: &[Vec<f64>],
        re: f64,
        mu: f64,
    ) -> Result<[f64; 3], SphericalHarmonicsErrors> {
        self.check_table(c)?;
        self.check_table(s)?;
        self.recurse(r, re);

        let v = &self.v;
        let w = &self.w;

        let mut ax = 0.0;
        let mut ay = 0.0;
        let mut az = 0.0;

        for n in 0..=self.degree {
            let nf = n as f64;
            let degree_ratio = (2.0 * nf + 1.0) / (2.0 * nf + 3.0);

            for m in 0..=n.min(self.order) {
                let mf = m as f64;
                let cnm = c[n][m];
                let snm = s[n][m];

                if m == 0 {
                    let k = (0.5 * degree_ratio * (nf + 1.0) * (nf + 2.0)).sqrt();
                    ax -= k * cnm * v[n + 1][1];
                    ay -= k * cnm * w[n + 1][1];
                } else {
                    let k_up = (degree_ratio * (nf + mf + 1.0) * (nf + mf + 2.0)).sqrt();
                    // the m-1 = 0 column carries the extra factor of 2 from the normalization
                    let delta = if m == 1 { 2.0 } else { 1.0 };
                    let k_down =
                        (delta * degree_ratio * (nf - mf + 2.0) * (nf - mf + 1.0)).sqrt();

                    ax += 0.5
                        * (k_up * (-cnm * v[n + 1][m + 1] - snm * w[n + 1][m + 1])
                            + k_down * (cnm * v[n + 1][m - 1] + snm * w[n + 1][m - 1]));
                    ay += 0.5
                        * (k_up * (-cnm * w[n + 1][m + 1] + snm * v[n + 1][m + 1])
                            + k_down * (-cnm * w[n + 1][m - 1] + snm * v[n + 1][m - 1]));
                }

                let k_z = (degree_ratio * (nf + mf + 1.0) * (nf - mf + 1.0)).sqrt();
                az += k_z * (-cnm * v[n + 1][m] - snm * w[n + 1][m]);
            }
        }

        let scale = mu / (re * re);
        Ok([ax * scale, ay * scale, az * scale])
    }

    /// returns U
    pub fn potential(
        &mut self,
        r: [f64; 3],
        c: &[Vec<f64>],
        s: &[Vec<f64>],
        re: f64,
        mu: f64,
    ) -> Result<f64, SphericalHarmonicsErrors> {
        self.check_table(c)?;
        self.check_table(s)?;
        self.recurse(r, re);

        let mut u = 0.0;
        for n in 0..=self.degree {
            for m in 0..=n.min(self.order) {
                u += c[n][m] * self.v[n][m] + s[n][m] * self.w[n][m];
            }
        }
        Ok(u * mu / re)
    }

    fn check_table(&self, table: &[Vec<f64>]) -> Result<(), SphericalHarmonicsErrors> {
        let too_small = table.len() <= self.degree
            || (0..=self.degree).any(|n| table[n].len() <= n.min(self.order));
        if too_small {
            return Err(SphericalHarmonicsErrors::CoefficientTableTooSmall {
                degree: self.degree,
                order: self.order,
            });
        }
        Ok(())
    }

    /// Fills V[n][m] and W[n][m] for n <= degree + 1 and m <= order + 1.
    fn recurse(&mut self, r: [f64; 3], re: f64) {
        let [x, y, z] = r;
        let r2 = x * x + y * y + z * z;
        let rho = re * re / r2;
        let x0 = re * x / r2;
        let y0 = re * y / r2;
        let z0 = re * z / r2;

        let n_max = self.degree + 1;
        let m_max = (self.order + 1).min(n_max);

        let v = &mut self.v;
        let w = &mut self.w;

        v[0][0] = re / r2.sqrt();
        w[0][0] = 0.0;

        for m in 0..=m_max {
            let mf = m as f64;

            if m > 0 {
                // sectoral
                let k = if m == 1 {
                    3.0_f64.sqrt()
                } else {
                    ((2.0 * mf + 1.0) / (2.0 * mf)).sqrt()
                };
                let (v_prev, w_prev) = (v[m - 1][m - 1], w[m - 1][m - 1]);
                v[m][m] = k * (x0 * v_prev - y0 * w_prev);
                w[m][m] = k * (x0 * w_prev + y0 * v_prev);
            }

            for n in m + 1..=n_max {
                let nf = n as f64;
                let a = ((2.0 * nf - 1.0) * (2.0 * nf + 1.0) / ((nf - mf) * (nf + mf))).sqrt();
                v[n][m] = a * z0 * v[n - 1][m];
                w[n][m] = a * z0 * w[n - 1][m];

                if n >= m + 2 {
                    let b = ((2.0 * nf + 1.0) * (nf + mf - 1.0) * (nf - mf - 1.0)
                        / ((2.0 * nf - 3.0) * (nf + mf) * (nf - mf)))
                        .sqrt();
                    v[n][m] -= b * rho * v[n - 2][m];
                    w[n][m] -= b * rho * w[n - 2][m];
                }
            }
        }
    }
}
