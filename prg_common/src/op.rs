//! Boilerplate-reducing macro for implementing arithmetic on newtype wrappers
//! around a single integral field.

#[macro_export]
macro_rules! op {
    (binary $name:ident, $trait:ident, $method:ident) => {
        impl $trait for $name {
            type Output = Self;

            fn $method(self, rhs: Self) -> Self::Output {
                Self($trait::$method(self.0, rhs.0))
            }
        }
    };
    (inplace $name:ident, $trait:ident, $method:ident) => {
        impl $trait for $name {
            fn $method(&mut self, rhs: Self) {
                $trait::$method(&mut self.0, rhs.0)
            }
        }
    };
    (unary $name:ident, $trait:ident, $method:ident) => {
        impl $trait for $name {
            type Output = Self;

            fn $method(self) -> Self::Output {
                Self($trait::$method(self.0))
            }
        }
    };
}
