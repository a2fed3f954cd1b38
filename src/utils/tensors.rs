use burn::tensor::{backend::Backend, Bool, Data, ElementConversion, Int, Shape, Tensor};

/// Generation padding to a specific max length, typically to correlate with tokenzed sequences
pub fn pad_to<B: Backend>(
    pad_token: usize,
    tokens_list: Vec<Vec<usize>>,
    seq_length: usize,
    device: &B::Device,
) -> Tensor<B, 2, Int> {
    let batch_size = tokens_list.len();

    let mut tensor = Tensor::zeros([batch_size, seq_length], device);
    tensor = tensor.add_scalar(pad_token as i64);

    for (index, tokens) in tokens_list.into_iter().enumerate() {
        let tokens: Vec<_> = tokens.into_iter().take(seq_length).collect();
        let length = tokens.len();

        if length == 0 {
            continue;
        }

        tensor = tensor.slice_assign(
            [index..index + 1, 0..length],
            Tensor::from_data(
                Data::new(
                    tokens.into_iter().map(|e| (e as i64).elem()).collect(),
                    Shape::new([1, length]),
                ),
                device,
            ),
        );
    }

    tensor
}

/// A padding mask with `true` at every position past each sequence's length
pub fn padding_mask<B: Backend>(
    lengths: &[usize],
    seq_length: usize,
    device: &B::Device,
) -> Tensor<B, 2, Bool> {
    let mask = lengths
        .iter()
        .flat_map(|length| (0..seq_length).map(move |position| position >= *length))
        .collect();

    Tensor::from_data(Data::new(mask, Shape::new([lengths.len(), seq_length])), device)
}

/// Build a 1D integer tensor from a list of positions
pub fn positions<B: Backend>(positions: &[usize], device: &B::Device) -> Tensor<B, 1, Int> {
    Tensor::from_data(
        Data::new(
            positions.iter().map(|p| (*p as i64).elem()).collect(),
            Shape::new([positions.len()]),
        ),
        device,
    )
}

/// Reduce a `[batch_size, seq_length]` tensor of logits to the arg-max position of each row
pub fn argmax_positions<B: Backend>(logits: Tensor<B, 2>) -> Vec<usize> {
    logits
        .argmax(1)
        .into_data()
        .convert::<i64>()
        .value
        .into_iter()
        .map(|index| index.max(0) as usize)
        .collect()
}

/// Split a `[batch_size, seq_length]` integer tensor into one row per batch item
pub fn rows<B: Backend>(tensor: Tensor<B, 2, Int>) -> Vec<Vec<i64>> {
    let [_batch_size, seq_length] = tensor.dims();

    if seq_length == 0 {
        return Vec::new();
    }

    tensor
        .into_data()
        .convert::<i64>()
        .value
        .chunks(seq_length)
        .map(|row| row.to_vec())
        .collect()
}
