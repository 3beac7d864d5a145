use std::{borrow::Cow, io};

use crate::{
    Code, Deserialize, Serialize, Status,
    specs::fcnn::{LayerWeights, ModelWeights, Request, Shape},
};

type Header = u32;
const HEADER_SIZE: usize = size_of::<Header>();
const F32_SIZE: usize = size_of::<f32>();

const ERR_H: Header = 0;
const REQUEST_H: Header = 1;
const RESPONSE_H: Header = 2;

/// The application layer message for the entire system.
#[derive(Debug)]
pub enum Msg<'a> {
    Err(Status<'a>),
    Request(Request),
    Response(ModelWeights),
}

impl Msg<'_> {
    /// A short name for the kind of the message, meant for logs and errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Msg::Err(_) => "err",
            Msg::Request(_) => "request",
            Msg::Response(_) => "response",
        }
    }

    fn buf_is_too_small<T>(what: &str, size: usize, expected: usize) -> io::Result<T> {
        Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("The given buffer is too small for the {what}, got {size} and must at least be {expected} bytes"),
        ))
    }

    fn invalid_kind<T>(kind: Header) -> io::Result<T> {
        Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Received an invalid kind header {kind}"),
        ))
    }

    fn dim_too_big(dim: usize) -> io::Error {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("The dimension {dim} does not fit in a {HEADER_SIZE} byte field"),
        )
    }

    /// Splits the leading big endian `u32` out of `buf`.
    fn take_u32<'b>(what: &str, buf: &'b [u8]) -> io::Result<(u32, &'b [u8])> {
        let Some((head, rest)) = buf.split_first_chunk::<HEADER_SIZE>() else {
            return Self::buf_is_too_small(what, buf.len(), HEADER_SIZE);
        };

        Ok((u32::from_be_bytes(*head), rest))
    }

    fn serialize_response(model: &ModelWeights, buf: &mut Vec<u8>) -> io::Result<()> {
        let count = u32::try_from(model.len()).map_err(|_| Self::dim_too_big(model.len()))?;
        buf.extend_from_slice(&count.to_be_bytes());

        for LayerWeights { weights, shape } in &model.layers {
            if weights.len() != shape.size() {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!(
                        "Layer of shape {shape} holds {} weights, expected {}",
                        weights.len(),
                        shape.size()
                    ),
                ));
            }

            for dim in [shape.rows, shape.cols] {
                let dim = u32::try_from(dim).map_err(|_| Self::dim_too_big(dim))?;
                buf.extend_from_slice(&dim.to_be_bytes());
            }
        }

        Ok(())
    }

    fn deserialize_response(buf: &[u8]) -> io::Result<ModelWeights> {
        let (count, mut rest) = Self::take_u32("layer count", buf)?;
        let count = count as usize;

        let shapes_size = count * 2 * HEADER_SIZE;
        if rest.len() < shapes_size {
            return Self::buf_is_too_small("layer shapes", rest.len(), shapes_size);
        }

        let mut shapes = Vec::with_capacity(count);
        for _ in 0..count {
            let (rows, tail) = Self::take_u32("rows", rest)?;
            let (cols, tail) = Self::take_u32("cols", tail)?;
            shapes.push(Shape::new(rows as usize, cols as usize));
            rest = tail;
        }

        let expected = shapes.iter().try_fold(0usize, |acc, shape| {
            shape
                .rows
                .checked_mul(shape.cols)?
                .checked_mul(F32_SIZE)?
                .checked_add(acc)
        });

        if expected != Some(rest.len()) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "The weights payload is {} bytes long and does not match the layer shapes",
                    rest.len()
                ),
            ));
        }

        let layers = shapes
            .into_iter()
            .map(|shape| {
                let (raw, tail) = rest.split_at(shape.size() * F32_SIZE);
                rest = tail;

                LayerWeights {
                    weights: read_f32s(raw),
                    shape,
                }
            })
            .collect();

        Ok(ModelWeights::new(layers))
    }
}

/// Copies the native endian floats out of `raw`, in place when it's suitably aligned.
fn read_f32s(raw: &[u8]) -> Vec<f32> {
    match bytemuck::try_cast_slice::<u8, f32>(raw) {
        Ok(nums) => nums.to_vec(),
        Err(_) => raw
            .chunks_exact(F32_SIZE)
            .map(bytemuck::pod_read_unaligned)
            .collect(),
    }
}

impl<'a> Serialize<'a> for Msg<'a> {
    fn serialize(&'a self, buf: &mut Vec<u8>) -> io::Result<Option<&'a [u8]>> {
        match self {
            Msg::Err(status) => {
                buf.extend_from_slice(&ERR_H.to_be_bytes());
                buf.extend_from_slice(&(status.code as u32).to_be_bytes());
                Ok(Some(status.message.as_bytes()))
            }
            Msg::Request(req) => {
                buf.extend_from_slice(&REQUEST_H.to_be_bytes());
                serde_json::to_writer(&mut *buf, req)?;
                Ok(None)
            }
            Msg::Response(model) => {
                buf.extend_from_slice(&RESPONSE_H.to_be_bytes());
                Self::serialize_response(model, buf)?;

                // A single layer can be written straight from the model.
                if let [layer] = model.layers.as_slice() {
                    return Ok(Some(bytemuck::cast_slice(&layer.weights)));
                }

                for layer in &model.layers {
                    buf.extend_from_slice(bytemuck::cast_slice(&layer.weights));
                }

                Ok(None)
            }
        }
    }
}

impl<'a> Deserialize<'a> for Msg<'a> {
    fn deserialize(buf: &'a [u8]) -> io::Result<Self> {
        let (kind, rest) = Self::take_u32("kind header", buf)?;

        match kind {
            ERR_H => {
                let (code, rest) = Self::take_u32("status code", rest)?;
                let code = Code::try_from(code)?;
                let message = std::str::from_utf8(rest)
                    .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;

                Ok(Self::Err(Status {
                    code,
                    message: Cow::Borrowed(message),
                }))
            }
            REQUEST_H => {
                let req = serde_json::from_slice(rest)
                    .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
                Ok(Self::Request(req))
            }
            RESPONSE_H => Ok(Self::Response(Self::deserialize_response(rest)?)),
            kind => Self::invalid_kind(kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_bytes(msg: &Msg) -> Vec<u8> {
        let mut buf = Vec::new();
        if let Some(data) = msg.serialize(&mut buf).unwrap() {
            buf.extend_from_slice(data);
        }
        buf
    }

    fn model() -> ModelWeights {
        ModelWeights::new(vec![
            LayerWeights {
                weights: vec![0.5, -1.0, 2.25, 3.0, 0.0, 1.5],
                shape: Shape::new(3, 2),
            },
            LayerWeights {
                weights: vec![7.0, 8.0, 9.0],
                shape: Shape::new(1, 3),
            },
        ])
    }

    #[test]
    fn response() {
        let bytes = to_bytes(&Msg::Response(model()));

        let Msg::Response(got) = Msg::deserialize(&bytes).unwrap() else {
            panic!("expected a response");
        };

        assert_eq!(got, model());
    }

    #[test]
    fn response_from_unaligned_buffer() {
        let mut bytes = vec![0];
        bytes.extend(to_bytes(&Msg::Response(model())));

        let Msg::Response(got) = Msg::deserialize(&bytes[1..]).unwrap() else {
            panic!("expected a response");
        };

        assert_eq!(got, model());
    }

    #[test]
    fn single_layer_response_is_zero_copy() {
        let model = ModelWeights::new(vec![LayerWeights {
            weights: vec![1.0, 2.0],
            shape: Shape::new(2, 1),
        }]);

        let msg = Msg::Response(model);
        let mut buf = Vec::new();
        let data = msg.serialize(&mut buf).unwrap().unwrap();

        assert_eq!(buf.len(), 4 * HEADER_SIZE);
        assert_eq!(data.len(), 2 * F32_SIZE);
    }

    #[test]
    fn empty_response() {
        let bytes = to_bytes(&Msg::Response(ModelWeights::default()));

        let Msg::Response(got) = Msg::deserialize(&bytes).unwrap() else {
            panic!("expected a response");
        };

        assert!(got.is_empty());
    }

    #[test]
    fn response_rejects_inconsistent_layers() {
        let model = ModelWeights::new(vec![LayerWeights {
            weights: vec![1.0; 5],
            shape: Shape::new(2, 3),
        }]);

        let err = Msg::Response(model).serialize(&mut Vec::new()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn truncated_response() {
        let bytes = to_bytes(&Msg::Response(model()));
        let err = Msg::deserialize(&bytes[..bytes.len() - 1]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn err() {
        let bytes = to_bytes(&Msg::Err(Status::internal("Error creating model: boom")));

        let Msg::Err(status) = Msg::deserialize(&bytes).unwrap() else {
            panic!("expected an error");
        };

        assert_eq!(status.code, Code::Internal);
        assert_eq!(status.message, "Error creating model: boom");
    }

    #[test]
    fn request() {
        let req = Request::CreateModel {
            architecture: vec![5, 10, 10, 1].into(),
        };
        let bytes = to_bytes(&Msg::Request(req.clone()));

        let Msg::Request(got) = Msg::deserialize(&bytes).unwrap() else {
            panic!("expected a request");
        };

        assert_eq!(got, req);
    }

    #[test]
    fn invalid_kind() {
        let bytes = 7u32.to_be_bytes();
        let err = Msg::deserialize(&bytes).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn empty_buffer() {
        let err = Msg::deserialize(&[]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
