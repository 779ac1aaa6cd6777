//! Reads embedded JPEG quantization tables (DQT markers) and flags
//! anomalous average/variance combinations that suggest heavy recompression.

const MARKER_SOI: u8 = 0xD8;
const MARKER_DQT: u8 = 0xDB;
const MARKER_SOS: u8 = 0xDA;
const MARKER_EOI: u8 = 0xD9;

pub struct QuantizationOutcome {
    pub fired: bool,
    pub avg: Option<f64>,
    pub variance: Option<f64>,
}

pub fn analyze(data: &[u8]) -> QuantizationOutcome {
    match extract_quantization_values(data) {
        Some(values) if !values.is_empty() => {
            let avg = values.iter().sum::<f64>() / values.len() as f64;
            let variance =
                values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;

            let fired = avg > 40.0 || (variance < 20.0 && avg > 20.0);

            QuantizationOutcome {
                fired,
                avg: Some(avg),
                variance: Some(variance),
            }
        }
        _ => QuantizationOutcome {
            fired: false,
            avg: None,
            variance: None,
        },
    }
}

fn extract_quantization_values(data: &[u8]) -> Option<Vec<f64>> {
    if data.len() < 2 || data[0] != 0xFF || data[1] != MARKER_SOI {
        return None;
    }

    let mut values = Vec::new();
    let mut pos = 2;

    while pos < data.len().saturating_sub(1) {
        if data[pos] != 0xFF {
            pos += 1;
            continue;
        }

        while pos < data.len() && data[pos] == 0xFF {
            pos += 1;
        }
        if pos >= data.len() {
            break;
        }

        let marker = data[pos];
        pos += 1;

        if marker == MARKER_SOI || marker == MARKER_EOI || (0xD0..=0xD7).contains(&marker) {
            continue;
        }

        if pos + 2 > data.len() {
            break;
        }
        let length = ((data[pos] as usize) << 8) | (data[pos + 1] as usize);

        if marker == MARKER_DQT {
            let segment_end = (pos + length).min(data.len());
            let mut seg_pos = pos + 2;

            while seg_pos < segment_end {
                if seg_pos >= data.len() {
                    break;
                }
                let pq_tq = data[seg_pos];
                let precision = (pq_tq >> 4) & 0x0F;
                seg_pos += 1;

                if precision == 0 {
                    if seg_pos + 64 > data.len() {
                        break;
                    }
                    for _ in 0..64 {
                        values.push(data[seg_pos] as f64);
                        seg_pos += 1;
                    }
                } else {
                    if seg_pos + 128 > data.len() {
                        break;
                    }
                    for _ in 0..64 {
                        let value = ((data[seg_pos] as u16) << 8) | (data[seg_pos + 1] as u16);
                        values.push(value as f64);
                        seg_pos += 2;
                    }
                }
            }
        }

        pos += length;

        if marker == MARKER_SOS {
            break;
        }
    }

    if values.is_empty() { None } else { Some(values) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_jpeg_data_yields_no_anomaly() {
        let outcome = analyze(&[0, 1, 2, 3]);
        assert!(!outcome.fired);
        assert!(outcome.avg.is_none());
    }
}
