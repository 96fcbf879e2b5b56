pub trait Subscriber<T> {
    fn consume(&mut self, data: T);
}

impl<T> Subscriber<T> for () {
    fn consume(&mut self, _data: T) {}
}

impl<T> Subscriber<T> for Vec<T> {
    fn consume(&mut self, data: T) {
        self.push(data)
    }
}
